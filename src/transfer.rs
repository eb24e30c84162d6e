// transfer.rs - Capture transfer remapping.
//
// A capture transfer table maps a capture number that receives a value to
// the capture numbers whose matches are transferred into it. Downstream
// transpilers thread the table through several rewrites; after unrolling,
// every number at or after the recursed span must be re-derived.

use std::collections::BTreeMap;

use crate::lexer::count_captures;

/// `to -> [from...]`, keyed by the receiving capture number.
pub type CaptureTransfers = BTreeMap<usize, Vec<usize>>;

/// Layout of the captures around one unrolled directive.
#[derive(Debug, Clone, Copy)]
struct Span {
    /// Last capture number before the recursed span (0 for global recursion).
    boundary: usize,
    /// Captures in the recursed span left of the directive.
    in_left: usize,
    /// Captures in the recursed span right of the directive.
    in_right: usize,
    reps: usize,
    added: usize,
}

impl Span {
    fn map_to(&self, to: usize) -> usize {
        if to > self.boundary + self.in_left {
            to + self.added
        } else {
            to
        }
    }

    fn map_from(&self, from: usize, out: &mut Vec<usize>) {
        let Span {
            boundary,
            in_left,
            in_right,
            reps,
            added,
        } = *self;
        if from <= boundary {
            out.push(from);
        } else if from > boundary + in_left + in_right {
            out.push(from + added);
        } else if from <= boundary + in_left {
            // Left of the directive: the original, then one per copy.
            out.extend((0..=reps).map(|i| from + in_left * i));
        } else {
            // Right of the directive: every copy, ending at the original.
            let added_in_left = in_left * reps;
            out.extend((0..=reps).map(|i| from + added_in_left + in_right * i));
        }
    }
}

/// Re-derive `transfers` after unrolling.
///
/// `left` is the recursed text left of the directive, `added` the number of
/// captures the unroll created and `captures_before` the captures opened
/// before the directive in the input.
pub(crate) fn map_capture_transfers(
    transfers: CaptureTransfers,
    left: &str,
    reps: usize,
    added: usize,
    captures_before: usize,
) -> CaptureTransfers {
    if transfers.is_empty() || added == 0 || reps == 0 {
        return transfers;
    }
    let in_left = count_captures(left);
    let span = Span {
        boundary: captures_before - in_left,
        in_left,
        in_right: (added - in_left * reps) / reps,
        reps,
        added,
    };
    transfers
        .into_iter()
        .map(|(to, from)| {
            let mut mapped = Vec::with_capacity(from.len());
            for f in from {
                span.map_from(f, &mut mapped);
            }
            (span.map_to(to), mapped)
        })
        .collect()
}
