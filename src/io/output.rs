//! Human readable and machine readable output of similarity matrices and merge histories.

use std::io::Write;

use itertools::Itertools;
use serde::Serialize;

use crate::errors::GuideTreeError;
use crate::guide_tree::MergeEvent;
use crate::similarity::SimilarityMatrix;

/// One merge event with leaf names instead of indices
#[derive(Debug, Clone, Serialize)]
pub struct MergeRecord<'a> {
    pub step: usize,
    pub left: Vec<&'a str>,
    pub right: Vec<&'a str>,
    pub score: f64,
}

impl<'a> MergeRecord<'a> {
    pub fn new<S>(step: usize, event: &MergeEvent, names: &'a [S]) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            step,
            left: leaf_names(&event.left_members, names),
            right: leaf_names(&event.right_members, names),
            score: event.score.mean(),
        }
    }
}

fn leaf_names<'a, S>(members: &[usize], names: &'a [S]) -> Vec<&'a str>
where
    S: AsRef<str>,
{
    members.iter()
        .map(|&leaf| names.get(leaf).map(|n| n.as_ref()).unwrap_or("?"))
        .collect()
}

/// Square table of pairwise scores, labelled by sequence name. The diagonal is left blank.
pub fn write_similarity_table<W, S>(
    mut writer: W,
    similarity: &SimilarityMatrix,
    names: &[S],
) -> Result<(), GuideTreeError>
where
    W: Write,
    S: AsRef<str>,
{
    let col_width = names.iter()
        .map(|n| n.as_ref().len())
        .chain(similarity.iter().map(|(_, _, score)| score.to_string().len()))
        .max()
        .unwrap_or(0)
        .max(4) + 1;

    write!(writer, "{:>col_width$}", "")?;
    for name in names {
        write!(writer, "{:>col_width$}", name.as_ref())?;
    }
    writeln!(writer)?;

    for (i, row_name) in names.iter().enumerate() {
        write!(writer, "{:>col_width$}", row_name.as_ref())?;
        for j in 0..names.len() {
            match similarity.get(i, j) {
                Some(score) => write!(writer, "{:>col_width$}", score)?,
                None => write!(writer, "{:>col_width$}", "")?,
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

/// One line per merge: step number, both member sets and the linkage score, tab separated.
pub fn write_merge_events<W, S>(
    mut writer: W,
    events: &[MergeEvent],
    names: &[S],
) -> Result<(), GuideTreeError>
where
    W: Write,
    S: AsRef<str>,
{
    for (step, event) in events.iter().enumerate() {
        writeln!(
            writer,
            "{}\t{{{}}}\t{{{}}}\t{}",
            step + 1,
            leaf_names(&event.left_members, names).iter().join(", "),
            leaf_names(&event.right_members, names).iter().join(", "),
            event.score
        )?;
    }

    Ok(())
}

pub fn write_merge_json<W, S>(
    mut writer: W,
    events: &[MergeEvent],
    names: &[S],
) -> Result<(), GuideTreeError>
where
    W: Write,
    S: AsRef<str>,
{
    let records: Vec<_> = events.iter()
        .enumerate()
        .map(|(step, event)| MergeRecord::new(step + 1, event, names))
        .collect();

    serde_json::to_writer_pretty(&mut writer, &records)
        .map_err(std::io::Error::from)?;
    writeln!(writer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::guide_tree::GuideTreeBuilder;
    use crate::similarity::SimilarityMatrix;
    use super::{write_merge_events, write_merge_json, write_similarity_table};

    fn example() -> SimilarityMatrix {
        SimilarityMatrix::from_condensed(3, vec![4, -4, -4]).unwrap()
    }

    #[test]
    fn test_similarity_table() {
        let mut out = Vec::new();
        write_similarity_table(&mut out, &example(), &["s1", "s2", "s3"]).unwrap();

        let table = String::from_utf8(out).unwrap();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "        s1   s2   s3");
        assert_eq!(lines[1], "   s1         4   -4");
        assert_eq!(lines[3], "   s3   -4   -4     ");
    }

    #[test]
    fn test_merge_listing() {
        let sim = example();
        let tree = GuideTreeBuilder::from_similarity(&sim).build().unwrap();
        let names = ["s1", "s2", "s3"];

        let mut out = Vec::new();
        write_merge_events(&mut out, tree.events(), &names).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\t{s1}\t{s2}\t4\n2\t{s3}\t{s1, s2}\t-4.000\n");

        let mut out = Vec::new();
        write_merge_json(&mut out, tree.events(), &names).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[1]["step"], 2);
        assert_eq!(parsed[1]["right"], serde_json::json!(["s1", "s2"]));
        assert_eq!(parsed[0]["score"], 4.0);
    }
}
