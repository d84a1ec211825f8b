//! printf-style formatting for hex Num parameters
//!
//! A Num node may carry a custom format such as `"0x%08x"` or `"%016llX"`.
//! Only a single integer conversion is supported:
//! `%[0][width][l|ll]{x,X,d,i,u}`, plus `%%` and literal text. Without a
//! length modifier the value is narrowed to 32 bits.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatSpecError {
    #[error("format ends inside a conversion")]
    Truncated,

    #[error("unsupported conversion %{0}")]
    Unsupported(char),

    #[error("format has more than one conversion")]
    TooManyConversions,

    #[error("field width exceeds {}", MAX_WIDTH)]
    WidthTooLarge,
}

/// Widest field a conversion may request
pub const MAX_WIDTH: usize = 64;

/// Render `value` through `format`
pub fn format_num(format: &str, value: i64) -> Result<String, FormatSpecError> {
    let mut out = String::with_capacity(format.len() + 16);
    let mut chars = format.chars().peekable();
    let mut converted = false;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        if converted {
            return Err(FormatSpecError::TooManyConversions);
        }
        converted = true;

        let zero_pad = chars.next_if_eq(&'0').is_some();
        let mut width = 0usize;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = width
                .checked_mul(10)
                .and_then(|w| w.checked_add(digit as usize))
                .filter(|&w| w <= MAX_WIDTH)
                .ok_or(FormatSpecError::WidthTooLarge)?;
            chars.next();
        }
        let mut wide = false;
        while chars.next_if_eq(&'l').is_some() {
            wide = true;
        }

        let conversion = chars.next().ok_or(FormatSpecError::Truncated)?;
        let digits = match (conversion, wide) {
            ('x', true) => format!("{:x}", value as u64),
            ('x', false) => format!("{:x}", value as u32),
            ('X', true) => format!("{:X}", value as u64),
            ('X', false) => format!("{:X}", value as u32),
            ('d' | 'i', true) => value.to_string(),
            ('d' | 'i', false) => (value as i32).to_string(),
            ('u', true) => (value as u64).to_string(),
            ('u', false) => (value as u32).to_string(),
            (other, _) => return Err(FormatSpecError::Unsupported(other)),
        };
        pad_into(&mut out, &digits, width, zero_pad);
    }
    Ok(out)
}

fn pad_into(out: &mut String, digits: &str, width: usize, zero_pad: bool) {
    let fill = width.saturating_sub(digits.len());
    if zero_pad {
        let (sign, magnitude) = match digits.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", digits),
        };
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(magnitude);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(digits);
    }
}
