//! Contiguous chunking of an input batch.

/// Split `items` into contiguous chunks of at most `size` elements,
/// preserving the original order.
///
/// `size` must be positive; configuration validation upholds this before any
/// chunking happens, so a zero here is a programming error.
///
/// # Examples
///
/// ```
/// use snapops_batch::split_into_chunks;
///
/// let chunks = split_into_chunks(vec![1, 2, 3, 4, 5], 2);
/// assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5]]);
/// ```
pub fn split_into_chunks<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    assert!(size > 0, "chunk size must be positive");
    let mut chunks: Vec<Vec<T>> = Vec::with_capacity(items.len().div_ceil(size));
    let mut rest = items;
    while rest.len() > size {
        let tail = rest.split_off(size);
        chunks.push(std::mem::replace(&mut rest, tail));
    }
    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(5, 2, vec![2, 2, 1])]
    #[case(6, 3, vec![3, 3])]
    #[case(1, 10, vec![1])]
    #[case(0, 4, vec![])]
    #[case(4, 1, vec![1, 1, 1, 1])]
    fn chunk_lengths(#[case] total: usize, #[case] size: usize, #[case] expected: Vec<usize>) {
        let chunks = split_into_chunks((0..total).collect(), size);
        let lengths: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(lengths, expected);
    }

    #[test]
    fn order_is_preserved() {
        let chunks = split_into_chunks(vec!["a", "b", "c", "d", "e"], 3);
        assert_eq!(chunks.concat(), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    #[should_panic(expected = "chunk size must be positive")]
    fn zero_size_is_a_programming_error() {
        split_into_chunks(vec![1], 0);
    }
}
