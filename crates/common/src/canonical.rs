/// Rotates `cycle` so that its smallest account id comes first.
///
/// The traversal direction is preserved, so a rotated cycle still describes
/// the same closed walk `c[0] -> c[1] -> ... -> c[k-1] -> c[0]`.
pub fn rotate_to_min(cycle: &[usize]) -> Vec<usize> {
    let pivot = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, id)| *id)
        .map_or(0, |(idx, _)| idx);

    let mut rotated = Vec::with_capacity(cycle.len());
    rotated.extend_from_slice(&cycle[pivot..]);
    rotated.extend_from_slice(&cycle[..pivot]);
    rotated
}

/// Maps a cycle to the single representative shared by all of its `2k`
/// rotations and reflections.
///
/// The cycle is rotated so the minimum id leads, then compared against its
/// reflection (same leading id, remaining ids in reverse order). The
/// lexicographically smaller of the two is returned.
///
/// Example:
/// ```text
/// [3, 1, 4, 2]  -> rotated   [1, 4, 2, 3]
///               -> reflected [1, 3, 2, 4]
///               -> canonical [1, 3, 2, 4]
/// ```
pub fn canonicalize(cycle: &[usize]) -> Vec<usize> {
    let rotated = rotate_to_min(cycle);
    if rotated.len() < 3 {
        return rotated;
    }

    let mut reflected = Vec::with_capacity(rotated.len());
    reflected.push(rotated[0]);
    reflected.extend(rotated[1..].iter().rev());

    if reflected < rotated {
        reflected
    } else {
        rotated
    }
}
