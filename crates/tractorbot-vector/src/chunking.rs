//! Splitting reference documents into snippets before embedding

use regex::Regex;
use std::collections::VecDeque;
use std::sync::OnceLock;

fn numbered_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\d+\.\s+").expect("static regex"))
}

/// Split a numbered document (`1. ...\n2. ...`) into trimmed, non-empty sections
pub fn split_numbered_sections(text: &str) -> Vec<String> {
    numbered_heading()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Size-bounded splitter that prefers paragraph, then line, then word
/// boundaries, carrying `overlap` characters between consecutive chunks.
#[derive(Debug, Clone)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    overlap: usize,
    separators: Vec<&'static str>,
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl RecursiveSplitter {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size.saturating_sub(1)),
            separators: vec!["\n\n", "\n", " ", ""],
        }
    }
    
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
            .into_iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect()
    }
    
    fn split_with(&self, text: &str, separators: &[&'static str]) -> Vec<String> {
        let (idx, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(**sep))
            .map(|(i, sep)| (i, *sep))
            .unwrap_or((separators.len().saturating_sub(1), ""));
        let remaining = &separators[(idx + 1).min(separators.len())..];
        
        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };
        
        let mut chunks = Vec::new();
        let mut small = Vec::new();
        for piece in pieces {
            if char_len(&piece) < self.chunk_size {
                small.push(piece);
                continue;
            }
            if !small.is_empty() {
                chunks.extend(self.merge(&small, separator));
                small.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_with(&piece, remaining));
            }
        }
        if !small.is_empty() {
            chunks.extend(self.merge(&small, separator));
        }
        chunks
    }
    
    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;
        
        for piece in pieces {
            let len = char_len(piece);
            let joiner = if current.is_empty() { 0 } else { sep_len };
            
            if total + len + joiner > self.chunk_size && !current.is_empty() {
                docs.push(current.iter().copied().collect::<Vec<_>>().join(separator));
                
                while total > self.overlap
                    || (total > 0 && total + len + if current.is_empty() { 0 } else { sep_len } > self.chunk_size)
                {
                    let Some(front) = current.pop_front() else { break };
                    total -= char_len(front) + if current.is_empty() { 0 } else { sep_len };
                }
            }
            
            let joiner = if current.is_empty() { 0 } else { sep_len };
            current.push_back(piece);
            total += len + joiner;
        }
        
        if !current.is_empty() {
            docs.push(current.iter().copied().collect::<Vec<_>>().join(separator));
        }
        docs
    }
}
