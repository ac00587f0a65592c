// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under MIT License.

//! # **Regex Compiler** - *Item Tree → Executable NFA Program*
//!
//! Thompson construction over the parsed item tree with `Nop` join points,
//! followed by finalisation:
//! - `Nop` chains collapse and the program compacts, so no reachable
//!   instruction is a `Nop`;
//! - `startinst_ids` captures the leading-`Or` fan-out for alternation
//!   pre-dispatch;
//! - patterns whose alternation branches return to themselves through
//!   zero-width instructions only (they would loop forever at runtime)
//!   are rejected.

use crate::regex::exec;
use crate::regex::inst::{CharClass, Inst, InstId, InstKind, NO_INST};
use crate::regex::parse::{Ast, parse};
use crate::{KernelError, Result};

/// Pattern-wide matching flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegexFlags {
    /// `^` and `$` also match at newlines.
    pub multiline: bool,
    /// `.` also matches newline.
    pub dotall: bool,
}

/// Compiled, finalised regex program.
#[derive(Debug, Clone)]
pub struct Reprog {
    pub insts: Vec<Inst>,
    pub classes: Vec<CharClass>,
    pub start_id: InstId,
    /// Leading-`Or` fan-out from the start instruction.
    pub startinst_ids: Vec<InstId>,
    pub num_groups: u32,
    pub flags: RegexFlags,
}

/// # Regex
///
/// Thompson-NFA regular expression engine for the string kernels.
///
/// ## Example
/// ```rust
/// use minframe::Regex;
///
/// let re = Regex::new("a(b|c){2,3}d").unwrap();
/// assert_eq!(re.find("abccd"), Some((0, 5)));
/// assert_eq!(re.extract("abccd", 1), Some((3, 4)));
/// ```
#[derive(Debug, Clone)]
pub struct Regex {
    prog: Reprog,
}

impl Regex {
    /// Compiles `pattern` with default flags.
    pub fn new(pattern: &str) -> Result<Regex> {
        Self::with_flags(pattern, RegexFlags::default())
    }

    /// Compiles `pattern` with explicit flags.
    pub fn with_flags(pattern: &str, flags: RegexFlags) -> Result<Regex> {
        Ok(Regex {
            prog: compile(pattern, flags)?,
        })
    }

    /// Leftmost match as `(begin, end)` codepoint offsets.
    pub fn find(&self, text: &str) -> Option<(usize, usize)> {
        exec::find(&self.prog, text)
    }

    /// Capture-group bounds of the leftmost match, `(begin, end)` codepoint
    /// offsets. Group 0 is the whole match.
    pub fn extract(&self, text: &str, group: usize) -> Option<(usize, usize)> {
        exec::extract(&self.prog, text, group)
    }

    /// Whether the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.find(text).is_some()
    }

    /// Number of capture groups (excluding group 0).
    pub fn num_capture_groups(&self) -> usize {
        self.prog.num_groups as usize
    }

    /// The finalised program.
    pub fn program(&self) -> &Reprog {
        &self.prog
    }
}

/// Where a dangling fragment edge lives: an instruction's `next` field or
/// an `Or`'s left branch.
#[derive(Debug, Clone, Copy)]
enum OutRef {
    Next(InstId),
    OrLeft(InstId),
}

/// A partially built sub-program: entry id plus unpatched exits.
struct Frag {
    start: InstId,
    outs: Vec<OutRef>,
}

struct Compiler {
    insts: Vec<Inst>,
    classes: Vec<CharClass>,
    flags: RegexFlags,
}

/// Compiles and finalises a pattern.
pub fn compile(pattern: &str, flags: RegexFlags) -> Result<Reprog> {
    let (ast, num_groups) = parse(pattern)?;
    let mut compiler = Compiler {
        insts: Vec::new(),
        classes: Vec::new(),
        flags,
    };

    // Group 0 wraps the whole pattern so match bounds ride the capture
    // machinery.
    let lbra = compiler.emit(InstKind::Lbra(0));
    let body = compiler.compile_node(&ast)?;
    let rbra = compiler.emit(InstKind::Rbra(0));
    let end = compiler.emit(InstKind::End);
    compiler.insts[lbra as usize].next = body.start;
    compiler.patch(&body.outs, rbra);
    compiler.insts[rbra as usize].next = end;

    let mut prog = Reprog {
        insts: compiler.insts,
        classes: compiler.classes,
        start_id: lbra,
        startinst_ids: Vec::new(),
        num_groups,
        flags,
    };
    collapse_nops(&mut prog);
    prog.startinst_ids = start_fanout(&prog);
    check_for_errors(&prog)?;
    Ok(prog)
}

impl Compiler {
    fn emit(&mut self, kind: InstKind) -> InstId {
        self.insts.push(Inst::new(kind));
        (self.insts.len() - 1) as InstId
    }

    fn patch(&mut self, outs: &[OutRef], target: InstId) {
        for out in outs {
            match *out {
                OutRef::Next(id) => self.insts[id as usize].next = target,
                OutRef::OrLeft(id) => match &mut self.insts[id as usize].kind {
                    InstKind::Or { left } => *left = target,
                    _ => unreachable!("OrLeft patch on non-Or"),
                },
            }
        }
    }

    fn compile_node(&mut self, ast: &Ast) -> Result<Frag> {
        match ast {
            Ast::Empty => {
                let id = self.emit(InstKind::Nop);
                Ok(Frag {
                    start: id,
                    outs: vec![OutRef::Next(id)],
                })
            }
            Ast::Char(c) => Ok(self.single(InstKind::Char(*c))),
            Ast::AnyChar => {
                let kind = if self.flags.dotall {
                    InstKind::AnyNl
                } else {
                    InstKind::Any
                };
                Ok(self.single(kind))
            }
            Ast::Class { class, negated } => {
                let id = self.classes.len();
                self.classes.push(class.clone());
                let kind = if *negated {
                    InstKind::NCClass(id)
                } else {
                    InstKind::CClass(id)
                };
                Ok(self.single(kind))
            }
            Ast::Bol => Ok(self.single(InstKind::Bol)),
            Ast::Eol => Ok(self.single(InstKind::Eol)),
            Ast::Bow => Ok(self.single(InstKind::Bow)),
            Ast::NBow => Ok(self.single(InstKind::NBow)),
            Ast::Group { index, inner } => {
                let inner = self.compile_node(inner)?;
                match index {
                    None => Ok(inner),
                    Some(g) => {
                        let lbra = self.emit(InstKind::Lbra(*g));
                        let rbra = self.emit(InstKind::Rbra(*g));
                        self.insts[lbra as usize].next = inner.start;
                        self.patch(&inner.outs, rbra);
                        Ok(Frag {
                            start: lbra,
                            outs: vec![OutRef::Next(rbra)],
                        })
                    }
                }
            }
            Ast::Concat(items) => {
                let mut frag: Option<Frag> = None;
                for item in items {
                    let next = self.compile_node(item)?;
                    frag = Some(match frag {
                        None => next,
                        Some(prev) => {
                            // Join through a Nop; finalisation collapses it.
                            let join = self.emit(InstKind::Nop);
                            self.patch(&prev.outs, join);
                            self.insts[join as usize].next = next.start;
                            Frag {
                                start: prev.start,
                                outs: next.outs,
                            }
                        }
                    });
                }
                match frag {
                    Some(frag) => Ok(frag),
                    None => self.compile_node(&Ast::Empty),
                }
            }
            Ast::Alt(items) => {
                let mut iter = items.iter();
                let first = self.compile_node(iter.next().expect("non-empty alt"))?;
                let mut frag = first;
                for item in iter {
                    let rhs = self.compile_node(item)?;
                    let or = self.emit(InstKind::Or { left: frag.start });
                    self.insts[or as usize].next = rhs.start;
                    let mut outs = frag.outs;
                    outs.extend(rhs.outs);
                    frag = Frag { start: or, outs };
                }
                Ok(frag)
            }
            Ast::Repeat { inner, min, max } => {
                let inner_frag = self.compile_node(inner)?;
                match (min, max) {
                    // x* — loop through the Or, exit via its next.
                    (0, None) => {
                        let or = self.emit(InstKind::Or {
                            left: inner_frag.start,
                        });
                        self.patch(&inner_frag.outs, or);
                        Ok(Frag {
                            start: or,
                            outs: vec![OutRef::Next(or)],
                        })
                    }
                    // x+ — body first, loop back via the Or.
                    (1, None) => {
                        let or = self.emit(InstKind::Or {
                            left: inner_frag.start,
                        });
                        self.patch(&inner_frag.outs, or);
                        Ok(Frag {
                            start: inner_frag.start,
                            outs: vec![OutRef::Next(or)],
                        })
                    }
                    // x? — take the body or skip it.
                    (0, Some(1)) => {
                        let or = self.emit(InstKind::Or {
                            left: inner_frag.start,
                        });
                        let mut outs = inner_frag.outs;
                        outs.push(OutRef::Next(or));
                        Ok(Frag { start: or, outs })
                    }
                    _ => Err(KernelError::internal(
                        "counted repetition survived expansion",
                    )),
                }
            }
        }
    }

    fn single(&mut self, kind: InstKind) -> Frag {
        let id = self.emit(kind);
        Frag {
            start: id,
            outs: vec![OutRef::Next(id)],
        }
    }
}

/// Rewrites every edge through `Nop` chains to the first non-`Nop`
/// successor, then compacts the program, dropping the `Nop`s.
fn collapse_nops(prog: &mut Reprog) {
    let n = prog.insts.len();
    // Resolve each id to its first non-Nop successor.
    let mut resolved: Vec<InstId> = vec![NO_INST; n];
    fn resolve(id: InstId, insts: &[Inst], resolved: &mut [InstId]) -> InstId {
        if id == NO_INST {
            return NO_INST;
        }
        if resolved[id as usize] != NO_INST {
            return resolved[id as usize];
        }
        let out = match insts[id as usize].kind {
            InstKind::Nop => resolve(insts[id as usize].next, insts, resolved),
            _ => id,
        };
        resolved[id as usize] = out;
        out
    }
    for id in 0..n as InstId {
        resolve(id, &prog.insts, &mut resolved);
    }

    // Compact: keep non-Nops, remap ids.
    let mut remap: Vec<InstId> = vec![NO_INST; n];
    let mut kept: Vec<Inst> = Vec::with_capacity(n);
    for (id, inst) in prog.insts.iter().enumerate() {
        if !matches!(inst.kind, InstKind::Nop) {
            remap[id] = kept.len() as InstId;
            kept.push(inst.clone());
        }
    }
    let map = |id: InstId, resolved: &[InstId], remap: &[InstId]| -> InstId {
        let r = if id == NO_INST { NO_INST } else { resolved[id as usize] };
        if r == NO_INST { NO_INST } else { remap[r as usize] }
    };
    for inst in &mut kept {
        inst.next = map(inst.next, &resolved, &remap);
        if let InstKind::Or { left } = &mut inst.kind {
            *left = map(*left, &resolved, &remap);
        }
    }
    prog.start_id = map(prog.start_id, &resolved, &remap);
    prog.insts = kept;
}

/// Enumerates the leading-`Or` fan-out reachable from the start
/// instruction: the set of first non-`Or` instructions execution can begin
/// at.
fn start_fanout(prog: &Reprog) -> Vec<InstId> {
    let mut out = Vec::new();
    let mut seen = vec![false; prog.insts.len()];
    let mut stack = vec![prog.start_id];
    while let Some(id) = stack.pop() {
        if id == NO_INST || seen[id as usize] {
            continue;
        }
        seen[id as usize] = true;
        match prog.insts[id as usize].kind {
            InstKind::Or { left } => {
                // Preserve priority: left branch dispatches first.
                stack.push(prog.insts[id as usize].next);
                stack.push(left);
            }
            _ => out.push(id),
        }
    }
    out
}

/// Rejects programs containing a cycle of zero-width instructions: such a
/// loop would never consume input at runtime.
fn check_for_errors(prog: &Reprog) -> Result<()> {
    const WHITE: u8 = 0;
    const GREY: u8 = 1;
    const BLACK: u8 = 2;
    let n = prog.insts.len();
    let mut color = vec![WHITE; n];

    fn dfs(id: InstId, prog: &Reprog, color: &mut [u8]) -> bool {
        if id == NO_INST {
            return false;
        }
        let idx = id as usize;
        let inst = &prog.insts[idx];
        if !inst.is_zero_width() {
            return false;
        }
        match color[idx] {
            GREY => return true,
            BLACK => return false,
            _ => {}
        }
        color[idx] = GREY;
        let mut cyclic = dfs(inst.next, prog, color);
        if let InstKind::Or { left } = inst.kind {
            cyclic = cyclic || dfs(left, prog, color);
        }
        color[idx] = BLACK;
        cyclic
    }

    for id in 0..n as InstId {
        if color[id as usize] == WHITE && dfs(id, prog, &mut color) {
            return Err(KernelError::invalid_argument(
                "pattern would loop without consuming input",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_nops_after_finalisation() {
        for pattern in ["abc", "a(b|c)*d", "a{2,4}b", "(x|y|z)+", "a?b?c?"] {
            let prog = compile(pattern, RegexFlags::default()).unwrap();
            assert!(
                prog.insts
                    .iter()
                    .all(|inst| !matches!(inst.kind, InstKind::Nop)),
                "pattern {pattern} kept a NOP"
            );
        }
    }

    #[test]
    fn test_edges_point_at_real_instructions() {
        let prog = compile("a(b|c){2,3}d", RegexFlags::default()).unwrap();
        for inst in &prog.insts {
            if !matches!(inst.kind, InstKind::End) {
                assert_ne!(inst.next, NO_INST);
                assert!((inst.next as usize) < prog.insts.len());
            }
            if let InstKind::Or { left } = inst.kind {
                assert!((left as usize) < prog.insts.len());
            }
        }
    }

    #[test]
    fn test_start_fanout_enumerates_alternation() {
        let prog = compile("ab|cd|ef", RegexFlags::default()).unwrap();
        // Start is Lbra(0); the fan-out is the single entry behind it.
        assert_eq!(prog.startinst_ids.len(), 1);
        let prog = compile("a|b", RegexFlags::default()).unwrap();
        assert!(!prog.startinst_ids.is_empty());
    }

    #[test]
    fn test_empty_capture_loop_rejected() {
        assert!(compile("(())*", RegexFlags::default()).is_err());
        assert!(compile("(?:)*", RegexFlags::default()).is_err());
        // Consuming loops are fine.
        assert!(compile("(a*)", RegexFlags::default()).is_ok());
        assert!(compile("(ab)*", RegexFlags::default()).is_ok());
    }

    #[test]
    fn test_group_count() {
        let re = Regex::new("(a)(b(c))").unwrap();
        assert_eq!(re.num_capture_groups(), 3);
    }
}
