//! Path-data tokenizer.
//!
//! Scans the `d` attribute text into a [`PathCommand`] list. The scanner is
//! a peekable character cursor: a command letter selects the active grammar
//! rule, and bare numbers repeat the active command (with the SVG special
//! case that coordinate pairs after a move continue as line commands).

use crate::PathCommand;
use std::iter::Peekable;
use std::str::Chars;

/// Tokenize path-data text into an ordered command list.
///
/// Malformed trailing operands terminate the scan; unknown command letters
/// are preserved as [`PathCommand::Unsupported`] entries.
pub fn tokenize(d: &str) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut chars = d.chars().peekable();
    let mut cmd = ' ';

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() || c == ',' {
            chars.next();
            continue;
        }

        if c.is_ascii_alphabetic() {
            chars.next();
            match c {
                'Z' | 'z' => {
                    commands.push(PathCommand::Close);
                    cmd = ' ';
                }
                'M' | 'm' | 'L' | 'l' | 'H' | 'h' | 'V' | 'v' | 'C' | 'c' | 'S' | 's' | 'Q'
                | 'q' | 'T' | 't' | 'A' | 'a' => cmd = c,
                _ => {
                    // Record the unknown letter once; its operands are
                    // swallowed below.
                    commands.push(PathCommand::Unsupported(c));
                    cmd = '?';
                }
            }
            continue;
        }

        // Operands of an unknown command are swallowed so the scan can
        // resume at the next command letter.
        if cmd == '?' {
            if next_number(&mut chars).is_none() {
                chars.next();
            }
            continue;
        }

        // A number with no active command is unparseable input; stop.
        if cmd == ' ' {
            break;
        }

        let abs = cmd.is_ascii_uppercase();
        match cmd.to_ascii_uppercase() {
            'M' => {
                if let (Some(x), Some(y)) = (next_number(&mut chars), next_number(&mut chars)) {
                    commands.push(PathCommand::MoveTo { abs, x, y });
                    // Implicit subsequent pairs are line commands.
                    cmd = if abs { 'L' } else { 'l' };
                } else {
                    break;
                }
            }
            'L' => {
                if let (Some(x), Some(y)) = (next_number(&mut chars), next_number(&mut chars)) {
                    commands.push(PathCommand::LineTo { abs, x, y });
                } else {
                    break;
                }
            }
            'H' => {
                if let Some(x) = next_number(&mut chars) {
                    commands.push(PathCommand::HorizontalTo { abs, x });
                } else {
                    break;
                }
            }
            'V' => {
                if let Some(y) = next_number(&mut chars) {
                    commands.push(PathCommand::VerticalTo { abs, y });
                } else {
                    break;
                }
            }
            'C' => {
                if let (Some(x1), Some(y1), Some(x2), Some(y2), Some(x), Some(y)) = (
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                ) {
                    commands.push(PathCommand::CubicTo {
                        abs,
                        x1,
                        y1,
                        x2,
                        y2,
                        x,
                        y,
                    });
                } else {
                    break;
                }
            }
            'S' => {
                if let (Some(x2), Some(y2), Some(x), Some(y)) = (
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                ) {
                    commands.push(PathCommand::SmoothCubicTo { abs, x2, y2, x, y });
                } else {
                    break;
                }
            }
            'Q' => {
                if let (Some(x1), Some(y1), Some(x), Some(y)) = (
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                ) {
                    commands.push(PathCommand::QuadTo { abs, x1, y1, x, y });
                } else {
                    break;
                }
            }
            'T' => {
                if let (Some(x), Some(y)) = (next_number(&mut chars), next_number(&mut chars)) {
                    commands.push(PathCommand::SmoothQuadTo { abs, x, y });
                } else {
                    break;
                }
            }
            'A' => {
                if let (Some(rx), Some(ry), Some(rotation), Some(large_arc), Some(sweep)) = (
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_number(&mut chars),
                    next_flag(&mut chars),
                    next_flag(&mut chars),
                ) {
                    if let (Some(x), Some(y)) = (next_number(&mut chars), next_number(&mut chars))
                    {
                        commands.push(PathCommand::ArcTo {
                            abs,
                            rx,
                            ry,
                            rotation,
                            large_arc,
                            sweep,
                            x,
                            y,
                        });
                    } else {
                        break;
                    }
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    commands
}

/// Scan one number: optional sign, decimal point, exponent.
fn next_number(chars: &mut Peekable<Chars<'_>>) -> Option<f32> {
    while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
        chars.next();
    }

    let mut s = String::new();
    let mut has_dot = false;
    let mut has_exp = false;

    if chars.peek().is_some_and(|c| *c == '-' || *c == '+') {
        s.push(chars.next().unwrap());
    }

    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            s.push(chars.next().unwrap());
        } else if c == '.' && !has_dot && !has_exp {
            has_dot = true;
            s.push(chars.next().unwrap());
        } else if (c == 'e' || c == 'E') && !has_exp && !s.is_empty() {
            has_exp = true;
            s.push(chars.next().unwrap());
            if chars.peek().is_some_and(|c| *c == '-' || *c == '+') {
                s.push(chars.next().unwrap());
            }
        } else {
            break;
        }
    }

    if s.is_empty() || s == "-" || s == "+" {
        None
    } else {
        s.parse().ok()
    }
}

/// Scan one arc flag: a bare `0` or `1` digit.
fn next_flag(chars: &mut Peekable<Chars<'_>>) -> Option<bool> {
    while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',') {
        chars.next();
    }
    match chars.next() {
        Some('0') => Some(false),
        Some('1') => Some(true),
        _ => None,
    }
}
