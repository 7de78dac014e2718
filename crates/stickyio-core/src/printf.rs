//! printf formatting engine.
//!
//! A format string is a run of literal text and `%` directives. Each
//! directive takes the next argument and renders it with C-style flags,
//! width and precision. Arguments that do not fit their verb are reported
//! inline instead of failing the call:
//!
//! * `%!d(MISSING)` when the argument list runs out,
//! * `%!d(str=x)` when the argument has the wrong kind,
//! * `%!(EXTRA i64=2, bool=true)` after the output for unused arguments,
//! * `%!(BADWIDTH)` / `%!(BADPREC)` for a `*` without an integer argument.
//!
//! Width padding and precision are each capped at 4096 bytes per directive,
//! so a directive expands to at most those two caps plus the digits of its
//! value.

use std::fmt;
use std::io::Write as _;

// ---------------------------------------------------------------------------
// Directive model
// ---------------------------------------------------------------------------

/// Flags parsed from a format directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub force_sign: bool,   // '+'
    pub space_sign: bool,   // ' '
    pub alt_form: bool,     // '#'
    pub zero_pad: bool,     // '0'
}

/// Width or precision of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Absent,
    Fixed(usize),
    /// `*`: taken from the argument list.
    FromArg,
}

impl Count {
    fn fixed(self) -> Option<usize> {
        match self {
            Count::Fixed(n) => Some(n),
            _ => None,
        }
    }
}

/// Integer narrowing requested by a length modifier. `l`, `ll`, `z`, `t`,
/// `j` and `L` are accepted and leave the value as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    Native,
    /// `h`
    Half,
    /// `hh`
    Byte,
}

/// One parsed `%` directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Count,
    pub precision: Count,
    pub narrow: IntWidth,
    pub verb: u8,
}

const VERBS: &[u8] = b"diuxXocspvfFeEgG";

// ---------------------------------------------------------------------------
// Format arguments
// ---------------------------------------------------------------------------

/// A value handed to `printf`, `print` or `println`.
///
/// Only `Str` counts as a text operand for the spacing rule of `print`.
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    Int(i64),
    Uint(u64),
    Float(f64),
    Char(char),
    Bool(bool),
    Str(&'a str),
    Display(&'a dyn fmt::Display),
}

impl<'a> Arg<'a> {
    /// Wrap any `Display` value.
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        Arg::Display(value)
    }

    /// True for string operands.
    pub fn is_text(&self) -> bool {
        matches!(self, Arg::Str(_))
    }

    /// Kind shown in mismatch reports, e.g. the `str` of `%!d(str=x)`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Arg::Int(_) => "i64",
            Arg::Uint(_) => "u64",
            Arg::Float(_) => "f64",
            Arg::Char(_) => "char",
            Arg::Bool(_) => "bool",
            Arg::Str(_) => "str",
            Arg::Display(_) => "display",
        }
    }

    /// Integer view used for `*` width and precision.
    fn as_int(&self) -> Option<i64> {
        match *self {
            Arg::Int(v) => Some(v),
            Arg::Uint(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(v) => fmt::Display::fmt(v, f),
            Arg::Uint(v) => fmt::Display::fmt(v, f),
            Arg::Float(v) => fmt::Display::fmt(v, f),
            Arg::Char(v) => fmt::Display::fmt(v, f),
            Arg::Bool(v) => fmt::Display::fmt(v, f),
            Arg::Str(v) => f.write_str(v),
            Arg::Display(v) => fmt::Display::fmt(*v, f),
        }
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Arg::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Arg::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Arg::Char(v) => f.debug_tuple("Char").field(v).finish(),
            Arg::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Arg::Str(v) => f.debug_tuple("Str").field(v).finish(),
            Arg::Display(v) => f
                .debug_tuple("Display")
                .field(&format_args!("{v}"))
                .finish(),
        }
    }
}

macro_rules! arg_from {
    ($variant:ident($target:ty): $($source:ty),+) => {
        $(
            impl From<$source> for Arg<'_> {
                fn from(value: $source) -> Self {
                    Arg::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

arg_from!(Int(i64): i8, i16, i32, i64);
arg_from!(Uint(u64): u8, u16, u32, u64);
arg_from!(Float(f64): f32, f64);

impl From<isize> for Arg<'_> {
    fn from(value: isize) -> Self {
        Arg::Int(value as i64)
    }
}

impl From<usize> for Arg<'_> {
    fn from(value: usize) -> Self {
        Arg::Uint(value as u64)
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(value)
    }
}

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Bool(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

impl<'a> From<&'a String> for Arg<'a> {
    fn from(value: &'a String) -> Self {
        Arg::Str(value.as_str())
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// A piece of a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSegment<'a> {
    /// Bytes copied to the output unchanged.
    Literal(&'a [u8]),
    /// `%%`
    Percent,
    Directive(FormatSpec),
}

/// Lazily splits a format string into [`FormatSegment`]s.
///
/// A `%` that does not start a valid directive is yielded as a one-byte
/// literal and scanning resumes right after it.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    format: &'a [u8],
    pos: usize,
}

/// Iterate over the segments of `format`.
pub fn segments(format: &[u8]) -> Segments<'_> {
    Segments { format, pos: 0 }
}

impl<'a> Iterator for Segments<'a> {
    type Item = FormatSegment<'a>;

    fn next(&mut self) -> Option<FormatSegment<'a>> {
        let format = self.format;
        let rest = &format[self.pos..];
        let (&first, after) = rest.split_first()?;
        let (segment, used) = if first != b'%' {
            let len = rest.iter().position(|&b| b == b'%').unwrap_or(rest.len());
            (FormatSegment::Literal(&rest[..len]), len)
        } else if after.first() == Some(&b'%') {
            (FormatSegment::Percent, 2)
        } else {
            match parse_directive(after) {
                Some((spec, len)) => (FormatSegment::Directive(spec), 1 + len),
                None => (FormatSegment::Literal(&rest[..1]), 1),
            }
        };
        self.pos += used;
        Some(segment)
    }
}

/// Parse the directive whose text starts right after its `%`.
///
/// Returns the directive and how many bytes of `text` it spans, or `None`
/// when no supported verb ends it.
pub fn parse_directive(text: &[u8]) -> Option<(FormatSpec, usize)> {
    let mut cur = Cursor { text, pos: 0 };
    let flags = cur.flags();
    let width = cur.count().unwrap_or(Count::Absent);
    let precision = if cur.eat(b'.') {
        cur.count().unwrap_or(Count::Fixed(0))
    } else {
        Count::Absent
    };
    let narrow = cur.int_width();
    let verb = cur.bump().filter(|v| VERBS.contains(v))?;
    let spec = FormatSpec {
        flags,
        width,
        precision,
        narrow,
        verb,
    };
    Some((spec, cur.pos))
}

struct Cursor<'a> {
    text: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn eat(&mut self, want: u8) -> bool {
        let hit = self.peek() == Some(want);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn flags(&mut self) -> FormatFlags {
        let mut flags = FormatFlags::default();
        while let Some(b) = self.peek() {
            match b {
                b'-' => flags.left_justify = true,
                b'+' => flags.force_sign = true,
                b' ' => flags.space_sign = true,
                b'#' => flags.alt_form = true,
                b'0' => flags.zero_pad = true,
                _ => break,
            }
            self.pos += 1;
        }
        // '+' beats ' ', '-' beats '0'.
        flags.space_sign &= !flags.force_sign;
        flags.zero_pad &= !flags.left_justify;
        flags
    }

    fn count(&mut self) -> Option<Count> {
        if self.eat(b'*') {
            return Some(Count::FromArg);
        }
        let start = self.pos;
        let mut n = 0_usize;
        while let Some(d @ b'0'..=b'9') = self.peek() {
            n = n.saturating_mul(10).saturating_add(usize::from(d - b'0'));
            self.pos += 1;
        }
        (self.pos > start).then_some(Count::Fixed(n))
    }

    fn int_width(&mut self) -> IntWidth {
        if self.eat(b'h') {
            return if self.eat(b'h') {
                IntWidth::Byte
            } else {
                IntWidth::Half
            };
        }
        if self.eat(b'l') {
            self.eat(b'l');
        } else if matches!(self.peek(), Some(b'z' | b't' | b'j' | b'L')) {
            self.pos += 1;
        }
        IntWidth::Native
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Render `format` with `args` into `buf`.
///
/// Mismatches never fail the call; they render inline as described in the
/// module docs.
pub fn sprintf(format: &str, args: &[Arg<'_>], buf: &mut Vec<u8>) {
    let mut args = args.iter();
    for segment in segments(format.as_bytes()) {
        match segment {
            FormatSegment::Literal(bytes) => buf.extend_from_slice(bytes),
            FormatSegment::Percent => buf.push(b'%'),
            FormatSegment::Directive(spec) => {
                let spec = resolve_star_args(spec, &mut args, buf);
                render_directive(&spec, args.next(), buf);
            }
        }
    }
    report_extra(args.as_slice(), buf);
}

/// Render `args` in their default form, with a single space between two
/// operands only when neither of them is a string.
pub fn sprint(args: &[Arg<'_>], buf: &mut Vec<u8>) {
    let mut prev_text = false;
    for (i, arg) in args.iter().enumerate() {
        let text = arg.is_text();
        if i > 0 && !text && !prev_text {
            buf.push(b' ');
        }
        write_default(arg, buf);
        prev_text = text;
    }
}

/// Render `args` in their default form, space-separated, then a newline.
pub fn sprintln(args: &[Arg<'_>], buf: &mut Vec<u8>) {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        write_default(arg, buf);
    }
    buf.push(b'\n');
}

/// Render `value` in `base` into the END of `buf`, lowercase or uppercase
/// digits above 9. Returns the number of digits written.
///
/// `buf` must hold every digit: 64 bytes suffice for any `u64` in base 2.
pub fn render_digits(mut value: u64, base: u32, uppercase: bool, buf: &mut [u8]) -> usize {
    let end = buf.len();
    if value == 0 {
        buf[end - 1] = b'0';
        return 1;
    }
    let base = u64::from(base);
    let alpha = if uppercase { b'A' } else { b'a' };
    let mut pos = end;
    while value > 0 && pos > 0 {
        pos -= 1;
        let digit = (value % base) as u8;
        buf[pos] = if digit < 10 {
            b'0' + digit
        } else {
            alpha + (digit - 10)
        };
        value /= base;
    }
    end - pos
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Upper bound on padding emitted for a single width or precision.
const MAX_PAD: usize = 4096;

/// A rendered value laid out as `sign`, `prefix`, `zeros` zero digits and
/// `body`, padded out to the directive's width.
struct Field<'b> {
    sign: Option<u8>,
    prefix: &'static [u8],
    zeros: usize,
    body: &'b [u8],
    /// Columns taken by `body`; multi-byte text counts one per char.
    columns: usize,
    /// The '0' flag pads with zeros after the sign instead of spaces.
    zero_fill: bool,
}

impl<'b> Field<'b> {
    fn text(body: &'b [u8], columns: usize) -> Self {
        Field {
            sign: None,
            prefix: b"",
            zeros: 0,
            body,
            columns,
            zero_fill: false,
        }
    }

    fn number(sign: Option<u8>, body: &'b [u8]) -> Self {
        Field {
            sign,
            zero_fill: true,
            ..Field::text(body, body.len())
        }
    }

    fn emit(&self, spec: &FormatSpec, buf: &mut Vec<u8>) {
        let used = usize::from(self.sign.is_some())
            + self.prefix.len()
            + self.zeros.min(MAX_PAD)
            + self.columns;
        let fill = spec.width.fixed().unwrap_or(0).saturating_sub(used);
        let left = spec.flags.left_justify;
        let zeros_fill = self.zero_fill && spec.flags.zero_pad && !left;

        if !left && !zeros_fill {
            pad(buf, b' ', fill);
        }
        buf.extend(self.sign);
        buf.extend_from_slice(self.prefix);
        if zeros_fill {
            pad(buf, b'0', fill);
        }
        pad(buf, b'0', self.zeros);
        buf.extend_from_slice(self.body);
        if left {
            pad(buf, b' ', fill);
        }
    }
}

fn render_directive(spec: &FormatSpec, arg: Option<&Arg<'_>>, buf: &mut Vec<u8>) {
    let Some(&arg) = arg else {
        return bad_verb(spec.verb, None, buf);
    };
    match (spec.verb, arg) {
        (b'd' | b'i' | b'u' | b'x' | b'X' | b'o', Arg::Int(v)) => {
            let v = narrow_signed(v, spec.narrow);
            render_int(spec, sign_for(v < 0, spec.flags), v.unsigned_abs(), buf);
        }
        (b'd' | b'i' | b'u' | b'x' | b'X' | b'o', Arg::Uint(v)) => {
            render_int(spec, None, narrow_unsigned(v, spec.narrow), buf);
        }
        (b'd' | b'i' | b'u' | b'x' | b'X' | b'o', Arg::Char(c)) => {
            render_int(spec, None, u64::from(c), buf);
        }
        (b'c', Arg::Char(c)) => render_char(spec, c, buf),
        (b'c', Arg::Int(_) | Arg::Uint(_)) => {
            let c = arg
                .as_int()
                .and_then(|v| u32::try_from(v).ok())
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            render_char(spec, c, buf);
        }
        (b'f' | b'F' | b'e' | b'E' | b'g' | b'G', Arg::Float(v)) => render_float(spec, v, buf),
        (b'p', Arg::Uint(v)) => render_pointer(spec, v, buf),
        (b's' | b'v', Arg::Str(s)) => render_text(spec, s, buf),
        (b's' | b'v', other) => render_text(spec, &other.to_string(), buf),
        (verb, other) => bad_verb(verb, Some(&other), buf),
    }
}

fn render_int(spec: &FormatSpec, sign: Option<u8>, magnitude: u64, buf: &mut Vec<u8>) {
    let (base, uppercase) = match spec.verb {
        b'o' => (8, false),
        b'x' => (16, false),
        b'X' => (16, true),
        _ => (10, false),
    };
    let mut digits = [0u8; 64];
    let n = render_digits(magnitude, base, uppercase, &mut digits);
    let min_digits = spec.precision.fixed();

    // Zero at precision 0 prints no digits at all.
    let body: &[u8] = if magnitude == 0 && min_digits == Some(0) {
        b""
    } else {
        &digits[digits.len() - n..]
    };
    let mut field = Field::number(sign, body);
    field.zeros = min_digits.unwrap_or(1).saturating_sub(body.len());
    // An explicit precision turns the '0' flag off.
    field.zero_fill = min_digits.is_none();
    if magnitude != 0 && spec.flags.alt_form {
        let prefix: &'static [u8] = match spec.verb {
            b'o' => b"0",
            b'x' => b"0x",
            b'X' => b"0X",
            _ => b"",
        };
        field.prefix = prefix;
    }
    field.emit(spec, buf);
}

/// `%f`, `%e` and `%g` in both cases; digits come from Rust's float
/// formatting.
fn render_float(spec: &FormatSpec, value: f64, buf: &mut Vec<u8>) {
    let uppercase = spec.verb.is_ascii_uppercase();
    let sign = if value.is_nan() {
        None
    } else {
        sign_for(value.is_sign_negative(), spec.flags)
    };

    if !value.is_finite() {
        let word: &[u8] = match (value.is_nan(), uppercase) {
            (true, false) => b"nan",
            (true, true) => b"NAN",
            (false, false) => b"inf",
            (false, true) => b"INF",
        };
        let mut field = Field::text(word, word.len());
        field.sign = sign;
        return field.emit(spec, buf);
    }

    let precision = spec.precision.fixed().map_or(6, |p| p.min(MAX_PAD));
    let alt = spec.flags.alt_form;
    let magnitude = value.abs();
    let text = match spec.verb.to_ascii_lowercase() {
        b'e' => scientific(magnitude, precision, uppercase, alt),
        b'g' => general(magnitude, precision, uppercase, alt),
        _ => fixed_point(magnitude, precision, alt),
    };
    Field::number(sign, text.as_bytes()).emit(spec, buf);
}

/// Precision truncates to that many chars; width counts chars.
fn render_text(spec: &FormatSpec, text: &str, buf: &mut Vec<u8>) {
    let cut = spec
        .precision
        .fixed()
        .and_then(|limit| text.char_indices().nth(limit).map(|(at, _)| (at, limit)));
    let (shown, columns) = match cut {
        Some((at, limit)) => (&text[..at], limit),
        None => (text, text.chars().count()),
    };
    Field::text(shown.as_bytes(), columns).emit(spec, buf);
}

fn render_char(spec: &FormatSpec, c: char, buf: &mut Vec<u8>) {
    let mut utf8 = [0u8; 4];
    Field::text(c.encode_utf8(&mut utf8).as_bytes(), 1).emit(spec, buf);
}

fn render_pointer(spec: &FormatSpec, addr: u64, buf: &mut Vec<u8>) {
    if addr == 0 {
        return Field::text(b"(nil)", 5).emit(spec, buf);
    }
    let mut digits = [0u8; 64];
    let n = render_digits(addr, 16, false, &mut digits);
    let mut field = Field::text(&digits[digits.len() - n..], n);
    field.prefix = b"0x";
    field.emit(spec, buf);
}

// ---------------------------------------------------------------------------
// Argument bookkeeping
// ---------------------------------------------------------------------------

/// Replace `*` width and precision with values taken from the argument
/// list. A missing or non-integer value is reported and then ignored.
fn resolve_star_args<'a, 'b: 'a>(
    mut spec: FormatSpec,
    args: &mut impl Iterator<Item = &'a Arg<'b>>,
    buf: &mut Vec<u8>,
) -> FormatSpec {
    if spec.width == Count::FromArg {
        spec.width = match args.next().and_then(Arg::as_int) {
            Some(w) if w < 0 => {
                // Negative width means left-justify.
                spec.flags.left_justify = true;
                spec.flags.zero_pad = false;
                Count::Fixed(w.unsigned_abs() as usize)
            }
            Some(w) => Count::Fixed(w as usize),
            None => {
                buf.extend_from_slice(b"%!(BADWIDTH)");
                Count::Absent
            }
        };
    }
    if spec.precision == Count::FromArg {
        spec.precision = match args.next().and_then(Arg::as_int) {
            Some(p) if p >= 0 => Count::Fixed(p as usize),
            Some(_) => Count::Absent,
            None => {
                buf.extend_from_slice(b"%!(BADPREC)");
                Count::Absent
            }
        };
    }
    spec
}

fn narrow_signed(value: i64, narrow: IntWidth) -> i64 {
    match narrow {
        IntWidth::Byte => i64::from(value as i8),
        IntWidth::Half => i64::from(value as i16),
        IntWidth::Native => value,
    }
}

fn narrow_unsigned(value: u64, narrow: IntWidth) -> u64 {
    match narrow {
        IntWidth::Byte => u64::from(value as u8),
        IntWidth::Half => u64::from(value as u16),
        IntWidth::Native => value,
    }
}

fn bad_verb(verb: u8, arg: Option<&Arg<'_>>, buf: &mut Vec<u8>) {
    buf.extend_from_slice(b"%!");
    buf.push(verb);
    buf.push(b'(');
    match arg {
        Some(arg) => write_typed(arg, buf),
        None => buf.extend_from_slice(b"MISSING"),
    }
    buf.push(b')');
}

fn report_extra(unused: &[Arg<'_>], buf: &mut Vec<u8>) {
    if unused.is_empty() {
        return;
    }
    buf.extend_from_slice(b"%!(EXTRA ");
    for (i, arg) in unused.iter().enumerate() {
        if i > 0 {
            buf.extend_from_slice(b", ");
        }
        write_typed(arg, buf);
    }
    buf.push(b')');
}

fn write_typed(arg: &Arg<'_>, buf: &mut Vec<u8>) {
    buf.extend_from_slice(arg.kind_name().as_bytes());
    buf.push(b'=');
    write_default(arg, buf);
}

fn write_default(arg: &Arg<'_>, buf: &mut Vec<u8>) {
    // Writing into a Vec only fails if a Display impl reports an error;
    // whatever it produced up to that point is kept.
    let _ = write!(buf, "{arg}");
}

fn sign_for(negative: bool, flags: FormatFlags) -> Option<u8> {
    if negative {
        Some(b'-')
    } else if flags.force_sign {
        Some(b'+')
    } else if flags.space_sign {
        Some(b' ')
    } else {
        None
    }
}

fn pad(buf: &mut Vec<u8>, byte: u8, count: usize) {
    let count = count.min(MAX_PAD);
    buf.resize(buf.len() + count, byte);
}

// ---------------------------------------------------------------------------
// Float digits
// ---------------------------------------------------------------------------

fn fixed_point(value: f64, precision: usize, alt_form: bool) -> String {
    let mut s = format!("{value:.precision$}");
    if precision == 0 && alt_form {
        s.push('.');
    }
    s
}

/// Mantissa plus a signed exponent of at least two digits.
fn scientific(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> String {
    let raw = format!("{value:.precision$e}");
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    let mut out = String::with_capacity(raw.len() + 3);
    out.push_str(mantissa);
    if precision == 0 && alt_form {
        out.push('.');
    }
    out.push(if uppercase { 'E' } else { 'e' });
    out.push(if exp < 0 { '-' } else { '+' });
    let abs_exp = exp.unsigned_abs();
    if abs_exp < 10 {
        out.push('0');
    }
    out.push_str(&abs_exp.to_string());
    out
}

/// `%g`: scientific when the exponent is below -4 or at least the
/// precision, fixed otherwise. Trailing zeros go unless `#` is set.
fn general(value: f64, precision: usize, uppercase: bool, alt_form: bool) -> String {
    let p = precision.max(1);

    // The exponent decision uses the value as rounded to `p` significant digits.
    let exp = format!("{:.*e}", p - 1, value)
        .split_once('e')
        .and_then(|(_, e)| e.parse::<i32>().ok())
        .unwrap_or(0);

    if exp >= -4 && exp < p as i32 {
        let frac_digits = (p as i32 - 1 - exp).max(0) as usize;
        let mut s = format!("{value:.frac_digits$}");
        if !alt_form {
            strip_trailing_zeros(&mut s);
        } else if !s.contains('.') {
            s.push('.');
        }
        return s;
    }

    let s = scientific(value, p - 1, uppercase, alt_form);
    if alt_form {
        return s;
    }
    match s.find(['e', 'E']) {
        Some(at) => {
            let (mantissa, exp_part) = s.split_at(at);
            let mut mantissa = mantissa.to_string();
            strip_trailing_zeros(&mut mantissa);
            mantissa + exp_part
        }
        None => s,
    }
}

fn strip_trailing_zeros(s: &mut String) {
    if s.contains('.') {
        let kept = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(kept);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
