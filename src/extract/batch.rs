//! Parallel processing of many manuals.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::model::ProcessingResult;

use super::model_id::model_from_path;
use super::pipeline::Extractor;
use super::sink::ArtifactSink;
use super::ExtractOptions;

/// Process files in parallel, returning results in input order.
///
/// Files that map to the same model code share an image folder and file
/// names, so they are processed one after another in input order; distinct
/// models run concurrently.
pub fn process_batch<S>(paths: &[PathBuf], sink: &S, options: &ExtractOptions) -> Vec<ProcessingResult>
where
    S: ArtifactSink + Sync + ?Sized,
{
    process_batch_with(paths, sink, options, |_| {})
}

/// Like [`process_batch`], calling `on_done` as each document finishes.
pub fn process_batch_with<S, F>(
    paths: &[PathBuf],
    sink: &S,
    options: &ExtractOptions,
    on_done: F,
) -> Vec<ProcessingResult>
where
    S: ArtifactSink + Sync + ?Sized,
    F: Fn(&ProcessingResult) + Sync,
{
    let extractor = Extractor::new(options.clone());

    let mut groups: BTreeMap<String, Vec<(usize, &PathBuf)>> = BTreeMap::new();
    for (i, path) in paths.iter().enumerate() {
        groups.entry(model_from_path(path)).or_default().push((i, path));
    }
    log::debug!("{} files in {} model groups", paths.len(), groups.len());

    let mut results: Vec<(usize, ProcessingResult)> = groups
        .into_par_iter()
        .flat_map_iter(|(_, group)| {
            group
                .into_iter()
                .map(|(i, path)| {
                    let result = extractor.process_file(path, sink);
                    on_done(&result);
                    (i, result)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    results.sort_by_key(|(i, _)| *i);
    results.into_iter().map(|(_, r)| r).collect()
}
