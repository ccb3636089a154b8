//! Member bodies and the textual echo they produce.
//!
//! A transfer body answers with
//! `<tag>:<' ' + each group element>(<fixed slots joined by ' '>)`, e.g.
//! `A: some strings(true 42 666 * -559038737 944260662268981261 0.99 3.141592653589793 Secret)`.
//!
//! A value that is empty or contains whitespace, `(`, `)`, `"` or `\` is
//! written in double quotes with `"` and `\` backslash-escaped, so
//! `my secret` echoes as `"my secret"`.

use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

use smol_str::SmolStr;

use super::args::ArgValue;
use crate::error::InvocationError;
use crate::unit::{Body, ParamType, Signature};

/// Run `body` against bound arguments.
pub fn call_body(body: &Body, args: &[ArgValue]) -> Result<String, InvocationError> {
    match body {
        Body::Transfer { tag } => Ok(render_transfer(tag, args)),
        Body::Raise { message } => Err(InvocationError::raised(message.as_str())),
        Body::Tamper { tag } => {
            let mut args = args.to_vec();
            tamper(&mut args);
            Ok(render_transfer(tag, &args))
        }
    }
}

/// Render the echo of a transfer body.
pub fn render_transfer(tag: &str, args: &[ArgValue]) -> String {
    let mut group = String::new();
    let mut fixed = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            ArgValue::StrArray(items) => {
                for item in items {
                    group.push(' ');
                    group.push_str(&echo_text(item));
                }
            }
            other => fixed.push(echo_text(&other.to_string()).into_owned()),
        }
    }
    format!("{tag}:{group}({})", fixed.join(" "))
}

/// How `text` appears inside an echo.
pub fn echo_text(text: &str) -> Cow<'_, str> {
    let needs_quotes =
        text.is_empty() || text.chars().any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '"' | '\\'));
    if !needs_quotes {
        return Cow::Borrowed(text);
    }
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Corrupt the first integral scalar.
fn tamper(args: &mut [ArgValue]) {
    for arg in args.iter_mut() {
        match arg {
            ArgValue::Byte(v) => *v = v.wrapping_add(1),
            ArgValue::Short(v) => *v = v.wrapping_add(1),
            ArgValue::Int(v) => *v = v.wrapping_add(1),
            ArgValue::Long(v) => *v = v.wrapping_add(1),
            _ => continue,
        }
        return;
    }
}

/// A parsed echo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Echo {
    pub owner: SmolStr,
    pub group: Vec<SmolStr>,
    pub fixed: Vec<SmolStr>,
}

impl Echo {
    /// Split an echo into owner tag, group elements and fixed slots.
    pub fn parse(text: &str) -> Option<Echo> {
        let (owner, rest) = text.split_once(':')?;
        let mut chars = rest.chars().peekable();

        let mut group = Vec::new();
        while chars.next_if_eq(&' ').is_some() {
            group.push(read_value(&mut chars)?);
        }
        chars.next_if_eq(&'(')?;

        let mut fixed = Vec::new();
        if chars.next_if_eq(&')').is_none() {
            loop {
                fixed.push(read_value(&mut chars)?);
                if chars.next_if_eq(&')').is_some() {
                    break;
                }
                chars.next_if_eq(&' ')?;
            }
        }
        if chars.next().is_some() {
            return None;
        }

        Some(Echo {
            owner: SmolStr::new(owner),
            group,
            fixed,
        })
    }

    /// Read the echoed values back as arguments of `signature`.
    ///
    /// Slots that cannot be read as their parameter type are `None`.
    pub fn decode(&self, signature: &Signature) -> Vec<Option<ArgValue>> {
        let mut fixed = self.fixed.iter();
        signature
            .params()
            .iter()
            .map(|ty| match ty {
                ParamType::StrVarargs => Some(ArgValue::StrArray(self.group.clone())),
                ty => fixed.next().and_then(|text| ArgValue::parse_as(*ty, text)),
            })
            .collect()
    }
}

/// Read one bare or quoted value.
fn read_value(chars: &mut Peekable<Chars<'_>>) -> Option<SmolStr> {
    let mut value = String::new();
    if chars.next_if_eq(&'"').is_some() {
        loop {
            match chars.next()? {
                '"' => break,
                '\\' => value.push(chars.next()?),
                c => value.push(c),
            }
        }
    } else {
        while let Some(c) = chars.next_if(|c| !matches!(c, ' ' | '(' | ')')) {
            value.push(c);
        }
        if value.is_empty() {
            return None;
        }
    }
    Some(SmolStr::new(value))
}

/// The owner tag of an echo, if it has one.
pub fn owner_of(text: &str) -> Option<&str> {
    text.split_once(':').map(|(owner, _)| owner)
}
