// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Regex Executor** - *Thompson Simulation with Capture Registers*
//!
//! Unanchored, leftmost-greedy execution over the UTF-32 transliteration of
//! the target string. Two active-state lists (current and next position)
//! bound live state by the program's instruction count; threads carry
//! capture registers, so `extract` falls out of the same pass as `find`.
//!
//! All reported offsets are codepoint indices.

use crate::regex::compile::Reprog;
use crate::regex::inst::{InstId, InstKind, is_word_char};

/// One live NFA state: an instruction plus the thread's capture registers
/// (`2 * (groups + 1)` slots, begin/end pairs, `-1` = unset).
#[derive(Clone)]
struct Thread {
    id: InstId,
    caps: Vec<i32>,
}

struct Lists {
    threads: Vec<Thread>,
    seen: Vec<bool>,
}

impl Lists {
    fn new(n_insts: usize) -> Self {
        Self {
            threads: Vec::new(),
            seen: vec![false; n_insts],
        }
    }

    fn clear(&mut self) {
        self.threads.clear();
        self.seen.iter_mut().for_each(|s| *s = false);
    }
}

/// Leftmost match bounds over `text`.
pub fn find(prog: &Reprog, text: &str) -> Option<(usize, usize)> {
    let caps = run(prog, text)?;
    let (b, e) = (caps[0], caps[1]);
    if b < 0 || e < 0 {
        return None;
    }
    Some((b as usize, e as usize))
}

/// Bounds of `group` within the leftmost match. Group 0 is the whole match;
/// an unmatched optional group reports no bounds.
pub fn extract(prog: &Reprog, text: &str, group: usize) -> Option<(usize, usize)> {
    if group > prog.num_groups as usize {
        return None;
    }
    let caps = run(prog, text)?;
    let (b, e) = (caps[2 * group], caps[2 * group + 1]);
    if b < 0 || e < 0 {
        return None;
    }
    Some((b as usize, e as usize))
}

/// Runs the simulation, returning the winning thread's capture registers.
fn run(prog: &Reprog, text: &str) -> Option<Vec<i32>> {
    let chars: Vec<u32> = text.chars().map(|c| c as u32).collect();
    let n = chars.len();
    let n_caps = 2 * (prog.num_groups as usize + 1);

    let mut clist = Lists::new(prog.insts.len());
    let mut nlist = Lists::new(prog.insts.len());
    let mut matched: Option<Vec<i32>> = None;

    for pos in 0..=n {
        // Unanchored search: seed a lowest-priority start thread at every
        // position until something matches.
        if matched.is_none() {
            let caps = vec![-1; n_caps];
            add_thread(&mut clist, prog, &chars, prog.start_id, pos, caps);
        }
        if clist.threads.is_empty() {
            if matched.is_some() {
                break;
            }
            // Stale closure marks from a seed that died on an anchor.
            clist.clear();
            continue;
        }
        nlist.clear();
        let threads = std::mem::take(&mut clist.threads);
        for thread in threads {
            let inst = &prog.insts[thread.id as usize];
            match inst.kind {
                InstKind::End => {
                    // Higher-priority threads were processed first; this
                    // match supersedes anything a lower-priority thread
                    // could produce, so cut them.
                    matched = Some(thread.caps);
                    break;
                }
                InstKind::Char(c) => {
                    if pos < n && chars[pos] == c {
                        add_thread(&mut nlist, prog, &chars, inst.next, pos + 1, thread.caps);
                    }
                }
                InstKind::Any => {
                    if pos < n && chars[pos] != '\n' as u32 {
                        add_thread(&mut nlist, prog, &chars, inst.next, pos + 1, thread.caps);
                    }
                }
                InstKind::AnyNl => {
                    if pos < n {
                        add_thread(&mut nlist, prog, &chars, inst.next, pos + 1, thread.caps);
                    }
                }
                InstKind::CClass(id) => {
                    if pos < n && prog.classes[id].contains(chars[pos]) {
                        add_thread(&mut nlist, prog, &chars, inst.next, pos + 1, thread.caps);
                    }
                }
                InstKind::NCClass(id) => {
                    if pos < n && !prog.classes[id].contains(chars[pos]) {
                        add_thread(&mut nlist, prog, &chars, inst.next, pos + 1, thread.caps);
                    }
                }
                // Zero-width kinds were resolved by the epsilon closure.
                _ => unreachable!("zero-width instruction in a step list"),
            }
        }
        std::mem::swap(&mut clist, &mut nlist);
    }
    matched
}

/// Adds instruction `id` to `list` at `pos`, expanding the epsilon closure
/// (alternation, captures, anchors) inline. `seen` bounds the closure by
/// the instruction count.
fn add_thread(
    list: &mut Lists,
    prog: &Reprog,
    chars: &[u32],
    id: InstId,
    pos: usize,
    mut caps: Vec<i32>,
) {
    if id < 0 || list.seen[id as usize] {
        return;
    }
    list.seen[id as usize] = true;
    let inst = &prog.insts[id as usize];
    match inst.kind {
        InstKind::Or { left } => {
            add_thread(list, prog, chars, left, pos, caps.clone());
            add_thread(list, prog, chars, inst.next, pos, caps);
        }
        InstKind::Lbra(g) => {
            caps[2 * g as usize] = pos as i32;
            add_thread(list, prog, chars, inst.next, pos, caps);
        }
        InstKind::Rbra(g) => {
            caps[2 * g as usize + 1] = pos as i32;
            add_thread(list, prog, chars, inst.next, pos, caps);
        }
        InstKind::Bol => {
            let at = pos == 0
                || (prog.flags.multiline && chars.get(pos - 1) == Some(&('\n' as u32)));
            if at {
                add_thread(list, prog, chars, inst.next, pos, caps);
            }
        }
        InstKind::Eol => {
            let at = pos == chars.len()
                || (prog.flags.multiline && chars.get(pos) == Some(&('\n' as u32)));
            if at {
                add_thread(list, prog, chars, inst.next, pos, caps);
            }
        }
        InstKind::Bow | InstKind::NBow => {
            let before = pos > 0 && is_word_char(chars[pos - 1]);
            let after = pos < chars.len() && is_word_char(chars[pos]);
            let boundary = before != after;
            let wanted = matches!(inst.kind, InstKind::Bow);
            if boundary == wanted {
                add_thread(list, prog, chars, inst.next, pos, caps);
            }
        }
        InstKind::Nop => unreachable!("NOP survived finalisation"),
        _ => list.threads.push(Thread { id, caps }),
    }
}

#[cfg(test)]
mod tests {
    use crate::regex::compile::RegexFlags;
    use crate::Regex;

    #[test]
    fn test_literal_and_unanchored_find() {
        let re = Regex::new("bc").unwrap();
        assert_eq!(re.find("abcd"), Some((1, 3)));
        assert_eq!(re.find("xyz"), None);
        assert!(re.is_match("abc"));
    }

    #[test]
    fn test_alternation_and_greedy_star() {
        let re = Regex::new("ab|cd").unwrap();
        assert_eq!(re.find("zcdy"), Some((1, 3)));

        let re = Regex::new("a*").unwrap();
        assert_eq!(re.find("aaab"), Some((0, 3)));
        // Empty match at position 0 on a non-matching prefix.
        assert_eq!(re.find("bbb"), Some((0, 0)));
    }

    #[test]
    fn test_counted_repetition_greedy() {
        let re = Regex::new("a(b|c){2,3}d").unwrap();
        assert_eq!(re.find("abccd"), Some((0, 5)));
        assert_eq!(re.find("abcd"), Some((0, 4)));
        assert_eq!(re.find("abd"), None);
        assert_eq!(re.find("abcccd"), None);
    }

    #[test]
    fn test_extract_reports_last_alternative() {
        let re = Regex::new("a(b|c){2,3}d").unwrap();
        // Group 1 holds the last repetition: the final 'c'.
        assert_eq!(re.extract("abccd", 1), Some((3, 4)));
        assert_eq!(re.extract("abccd", 0), Some((0, 5)));
        assert_eq!(re.extract("abccd", 2), None);
    }

    #[test]
    fn test_unmatched_optional_group() {
        let re = Regex::new("a(b)?c").unwrap();
        assert_eq!(re.find("ac"), Some((0, 2)));
        assert_eq!(re.extract("ac", 1), None);
        assert_eq!(re.extract("abc", 1), Some((1, 2)));
    }

    #[test]
    fn test_anchors() {
        let re = Regex::new("^ab$").unwrap();
        assert!(re.is_match("ab"));
        assert!(!re.is_match("aab"));
        assert!(!re.is_match("abb"));

        let re = Regex::new("^b").unwrap();
        assert!(!re.is_match("a\nb"));
        let ml = Regex::with_flags(
            "^b",
            RegexFlags {
                multiline: true,
                dotall: false,
            },
        )
        .unwrap();
        assert!(ml.is_match("a\nb"));
    }

    #[test]
    fn test_dot_and_dotall() {
        let re = Regex::new("a.b").unwrap();
        assert!(re.is_match("axb"));
        assert!(!re.is_match("a\nb"));
        let dotall = Regex::with_flags(
            "a.b",
            RegexFlags {
                multiline: false,
                dotall: true,
            },
        )
        .unwrap();
        assert!(dotall.is_match("a\nb"));
    }

    #[test]
    fn test_classes_and_builtins() {
        let re = Regex::new(r"[a-c]+\d").unwrap();
        assert_eq!(re.find("zzabc7yy"), Some((2, 6)));
        let re = Regex::new(r"\w+").unwrap();
        assert_eq!(re.find("  héllo_9  "), Some((2, 9)));
        let re = Regex::new(r"[^x]+").unwrap();
        assert_eq!(re.find("xxab"), Some((2, 4)));
    }

    #[test]
    fn test_word_boundaries() {
        let re = Regex::new(r"\bcat\b").unwrap();
        assert!(re.is_match("a cat sat"));
        assert!(!re.is_match("concatenate"));
        let re = Regex::new(r"\Bcat").unwrap();
        assert!(re.is_match("concatenate"));
        assert!(!re.is_match("cat"));
        // Boundary seeds must stay live past positions where they fail.
        let re = Regex::new(r"\bcat").unwrap();
        assert_eq!(re.find("  cat"), Some((2, 5)));
    }

    #[test]
    fn test_leftmost_priority() {
        let re = Regex::new("a+").unwrap();
        assert_eq!(re.find("baaac"), Some((1, 4)));
    }

    #[test]
    fn test_unicode_codepoint_offsets() {
        let re = Regex::new("é").unwrap();
        // Offsets are codepoints, not bytes.
        assert_eq!(re.find("zzé"), Some((2, 3)));
    }
}
