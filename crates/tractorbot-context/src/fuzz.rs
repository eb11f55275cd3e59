//! Ratcliff/Obershelp string similarity on Unicode scalar values.
//!
//! Scores are on a 0..=100 scale. `partial_ratio` slides the shorter string
//! over the longer one, anchored at each matching block, and keeps the best
//! window.

use std::collections::HashMap;

/// `(start in a, start in b, length)`
type Block = (usize, usize, usize);

/// Length of `b` at which frequently repeated elements stop seeding matches
const AUTOJUNK_MIN_LEN: usize = 200;

struct Matcher<'a> {
    a: &'a [char],
    b: &'a [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> Matcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }
        
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let popular = n / 100 + 1;
            b2j.retain(|_, idxs| idxs.len() <= popular);
        }
        
        Self { a, b, b2j }
    }
    
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Block {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);
        
        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(idxs) = self.b2j.get(&a[i]) {
                for &j in idxs {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }
        
        // grow over elements dropped by the popularity filter
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi && bestj + bestsize < bhi && a[besti + bestsize] == b[bestj + bestsize] {
            bestsize += 1;
        }
        
        (besti, bestj, bestsize)
    }
    
    /// Matching blocks in order, adjacent blocks merged, ending with the
    /// `(len a, len b, 0)` sentinel.
    fn matching_blocks(&self) -> Vec<Block> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k > 0 {
                blocks.push((i, j, k));
                if alo < i && blo < j {
                    queue.push((alo, i, blo, j));
                }
                if i + k < ahi && j + k < bhi {
                    queue.push((i + k, ahi, j + k, bhi));
                }
            }
        }
        blocks.sort_unstable();
        
        let mut merged: Vec<Block> = Vec::with_capacity(blocks.len() + 1);
        for (i, j, k) in blocks {
            match merged.last_mut() {
                Some((i1, j1, k1)) if *i1 + *k1 == i && *j1 + *k1 == j => *k1 += k,
                _ => merged.push((i, j, k)),
            }
        }
        merged.push((la, lb, 0));
        merged
    }
    
    fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matches: usize = self.matching_blocks().iter().map(|b| b.2).sum();
        2.0 * matches as f64 / total as f64
    }
}

fn to_score(r: f64) -> u8 {
    (100.0 * r).round_ties_even() as u8
}

/// Similarity of two whole strings
pub fn ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    to_score(Matcher::new(&a, &b).ratio())
}

/// Best similarity of the shorter string against any same-length window of
/// the longer one. Identical strings score 100; otherwise an empty input
/// scores 0.
pub fn partial_ratio(a: &str, b: &str) -> u8 {
    if a == b {
        return 100;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    
    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    
    let mut best = 0.0f64;
    for (i, j, _) in Matcher::new(shorter, longer).matching_blocks() {
        let start = j.saturating_sub(i);
        let end = (start + shorter.len()).min(longer.len());
        let window = &longer[start..end];
        
        let r = Matcher::new(shorter, window).ratio();
        if r > 0.995 {
            return 100;
        }
        best = best.max(r);
    }
    to_score(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(a: &str, b: &str) -> Vec<Block> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        Matcher::new(&a, &b).matching_blocks()
    }

    #[test]
    fn test_matching_blocks() {
        assert_eq!(blocks("abxcd", "abcd"), vec![(0, 0, 2), (3, 2, 2), (5, 4, 0)]);
        assert_eq!(blocks("abc", "xyz"), vec![(3, 3, 0)]);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("", ""), 100);
        assert_eq!(ratio("abc", "abc"), 100);
        assert_eq!(ratio("abc", "xyz"), 0);
        // M = 4, T = 9
        assert_eq!(ratio("abxcd", "abcd"), 89);
    }

    #[test]
    fn test_partial_ratio_substring() {
        assert_eq!(partial_ratio("i need a dealer near pune", "dealer"), 100);
        assert_eq!(partial_ratio("dealer", "i need a dealer near pune"), 100);
    }

    #[test]
    fn test_partial_ratio_typo() {
        // best window "delaer": M = 5, T = 12
        assert_eq!(partial_ratio("where is the nearest delaer", "dealer"), 83);
        assert_eq!(partial_ratio("my tracter broke", "tractor"), 86);
    }

    #[test]
    fn test_partial_ratio_empty_and_equal() {
        assert_eq!(partial_ratio("", ""), 100);
        assert_eq!(partial_ratio("", "dealer"), 0);
        assert_eq!(partial_ratio("dealer", ""), 0);
        assert_eq!(partial_ratio("same", "same"), 100);
    }

    #[test]
    fn test_partial_ratio_disjoint() {
        assert!(partial_ratio("hello", "xyz") < 30);
    }

    #[test]
    fn test_long_text_autojunk_still_finds_trigger() {
        let mut message = "a".repeat(250);
        message.push_str(" spare parts ");
        assert_eq!(partial_ratio(&message, "spare parts"), 100);
    }
}
