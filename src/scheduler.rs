use std::{io::Write, ops::Range, thread};

use crossbeam::{
    channel::{self, Sender},
    sync::WaitGroup,
};
use log::{debug, trace, warn};

use crate::{
    error::{Result, RevcompError},
    indexed::IndexedSequence,
};

/// what a worker hands back: the finished sequence, or the failing index and why
pub type WorkerOutput = std::result::Result<IndexedSequence, (usize, RevcompError)>;

/// number of cores on this host, at least 1
pub fn available_parallelism() -> usize {
    num_cpus::get().max(1)
}

/// Splits `0..total` into consecutive ranges of `parallelism` items; the last
/// one may be shorter. A `parallelism` of 0 is treated as 1.
pub fn chunk_ranges(total: usize, parallelism: usize) -> Vec<Range<usize>> {
    let parallelism = parallelism.max(1);
    (0..total)
        .step_by(parallelism)
        .map(|start| start..(start + parallelism).min(total))
        .collect()
}

/// Reverse complements one sequence and sends the outcome on `sender`.
///
/// `done` belongs to the chunk's barrier. It is dropped when this function
/// returns or unwinds, which is what the scheduler waits on.
pub fn complement_worker(mut item: IndexedSequence, sender: Sender<WorkerOutput>, done: WaitGroup) {
    let index = item.index();
    let output = match item.reverse_complement_in_place() {
        Ok(()) => Ok(item),
        Err(err) => Err((index, err)),
    };
    trace!("worker {} finished, ok={}", index, output.is_ok());

    if let Err(err) = sender.send(output) {
        warn!("worker {}: {}", index, err);
    }
    drop(done);
}

/// Reverse complements every sequence and writes one line per input to
/// `writer`, in input order.
///
/// Work is dispatched in chunks of `parallelism` items, one thread per item.
/// A chunk is fully finished, sorted by index and written before the next
/// chunk starts. The first failing chunk stops the run: nothing from it is
/// written and later chunks never start. When several items in that chunk
/// fail, the error of the lowest index is returned.
///
/// Returns the number of lines written.
pub fn reverse_complement_all<W: Write>(
    sequences: &[String],
    parallelism: usize,
    writer: &mut W,
) -> Result<usize> {
    if sequences.is_empty() {
        return Err(RevcompError::MissingInput);
    }
    let parallelism = parallelism.max(1);
    debug!(
        "reverse complementing {} sequences, parallelism:{}",
        sequences.len(),
        parallelism
    );

    let (sender, recv) = channel::bounded::<WorkerOutput>(parallelism);
    let mut written = 0;

    for (chunk_idx, range) in chunk_ranges(sequences.len(), parallelism).into_iter().enumerate() {
        let chunk_len = range.len();
        debug!("chunk {}: dispatching {:?}", chunk_idx, range);

        // fresh barrier per chunk
        let done = WaitGroup::new();
        thread::scope(|thread_scope| {
            for index in range.clone() {
                let item = IndexedSequence::new(index, sequences[index].clone());
                let sender_ = sender.clone();
                let done_ = done.clone();
                thread_scope.spawn(move || {
                    complement_worker(item, sender_, done_);
                });
            }
            done.wait();
        });

        let mut results = Vec::with_capacity(chunk_len);
        let mut failures = Vec::new();
        // every worker has joined, so each one has already sent its result
        for output in recv.iter().take(chunk_len) {
            match output {
                Ok(item) => results.push(item),
                Err(failure) => failures.push(failure),
            }
        }

        if let Some((index, err)) = failures.into_iter().min_by_key(|(index, _)| *index) {
            debug!("chunk {}: sequence {} failed", chunk_idx, index);
            return Err(err);
        }

        results.sort_by_key(|item| item.index());
        for item in &results {
            writeln!(writer, "{}", item.seq())?;
        }
        writer.flush()?;
        written += results.len();
        debug!("chunk {}: wrote {} sequences", chunk_idx, results.len());
    }

    Ok(written)
}

#[cfg(test)]
mod test {
    use crossbeam::{channel, sync::WaitGroup};

    use super::{chunk_ranges, complement_worker, reverse_complement_all};
    use crate::{error::RevcompError, indexed::IndexedSequence};

    fn to_strings(seqs: &[&str]) -> Vec<String> {
        seqs.iter().map(|s| s.to_string()).collect()
    }

    fn run(seqs: &[String], parallelism: usize) -> (Result<usize, RevcompError>, String) {
        let mut out = Vec::new();
        let res = reverse_complement_all(seqs, parallelism, &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_chunk_ranges() {
        assert_eq!(chunk_ranges(5, 2), vec![0..2, 2..4, 4..5]);
        assert_eq!(chunk_ranges(4, 4), vec![0..4]);
        assert_eq!(chunk_ranges(3, 8), vec![0..3]);
        assert_eq!(chunk_ranges(2, 0), vec![0..1, 1..2]);
        assert!(chunk_ranges(0, 4).is_empty());
    }

    #[test]
    fn test_complement_worker() {
        let (sender, recv) = channel::bounded(1);
        let done = WaitGroup::new();
        complement_worker(IndexedSequence::new(7, "aaac".to_string()), sender, done.clone());
        done.wait();

        let item = recv.recv().unwrap().unwrap();
        assert_eq!(item, IndexedSequence::new(7, "GTTT".to_string()));
    }

    #[test]
    fn test_complement_worker_failure() {
        let (sender, recv) = channel::bounded(1);
        complement_worker(IndexedSequence::new(2, "AXA".to_string()), sender, WaitGroup::new());

        match recv.recv().unwrap() {
            Err((index, RevcompError::InvalidCharacter(c))) => {
                assert_eq!(index, 2);
                assert_eq!(c, 'X');
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_order_preserved() {
        let seqs = to_strings(&["GATTACA", "acgt", " AAAC ", "NNWS", "", "T", "CCCCAAAGT"]);
        let expected = "TGTAATC\nACGT\nGTTT\nSWNN\n\nA\nACTTTGGGG\n";
        for parallelism in 1..=10 {
            let (res, out) = run(&seqs, parallelism);
            assert_eq!(res.unwrap(), seqs.len());
            assert_eq!(out, expected, "parallelism {}", parallelism);
        }
    }

    #[test]
    fn test_output_stable_across_parallelism() {
        let seqs: Vec<String> = (0..64)
            .map(|i| "ACGTNWS-".chars().cycle().skip(i % 8).take(i + 1).collect())
            .collect();
        let (_, reference) = run(&seqs, 1);
        assert_eq!(reference.lines().count(), seqs.len());
        for parallelism in 2..=16 {
            for _ in 0..3 {
                let (res, out) = run(&seqs, parallelism);
                assert!(res.is_ok());
                assert_eq!(out, reference);
            }
        }
    }

    #[test]
    fn test_missing_input() {
        let (res, out) = run(&[], 4);
        assert!(matches!(res, Err(RevcompError::MissingInput)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_invalid_stops_run() {
        let seqs = to_strings(&["A", "C", "G", "T", "AXA", "T", "GG"]);

        // earlier chunks stay written, the failing chunk and the rest do not
        let (res, out) = run(&seqs, 2);
        assert!(matches!(res, Err(RevcompError::InvalidCharacter('X'))));
        assert_eq!(out, "T\nG\nC\nA\n");

        let (res, out) = run(&seqs, 8);
        assert!(matches!(res, Err(RevcompError::InvalidCharacter('X'))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_lowest_index_error_wins() {
        let seqs = to_strings(&["ACGT", "AZ", "AY", "AQ"]);
        for _ in 0..10 {
            let (res, _) = run(&seqs, 4);
            assert!(matches!(res, Err(RevcompError::InvalidCharacter('Z'))));
        }
    }
}
