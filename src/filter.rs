//! Pattern filtering and output rendering
//!
//! A pattern argument of the form `prefix@pattern` selects the host lines that
//! start with `pattern` and prints each one preceded by `prefix`. Without an
//! `@` the whole argument is the pattern and no prefix is added.

use std::io::{self, Write};

/// Prefix match applied to the final host list output
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternFilter {
    /// Text printed in front of every matching line
    pub display_prefix: String,
    /// Lines must start with this text to be printed
    pub pattern: String,
}

impl PatternFilter {
    /// Parses a command-line pattern argument
    ///
    /// Everything before the first `@` becomes the display prefix and
    /// everything after it the match pattern.
    pub fn parse(arg: &str) -> Self {
        match arg.split_once('@') {
            Some((prefix, pattern)) => Self {
                display_prefix: prefix.to_string(),
                pattern: pattern.to_string(),
            },
            None => Self {
                display_prefix: String::new(),
                pattern: arg.to_string(),
            },
        }
    }

    /// Returns the matching lines of `hosts`, rewritten with the display prefix
    ///
    /// Lines are split on `\n` only, so any `\r` stays part of the host name.
    /// The empty tail after the final newline is not a line.
    pub fn apply<'a>(&'a self, hosts: &'a str) -> impl Iterator<Item = String> + 'a {
        hosts
            .split_inclusive('\n')
            .map(|line| line.strip_suffix('\n').unwrap_or(line))
            .filter(move |line| line.starts_with(&self.pattern))
            .map(move |line| format!("{}{}", self.display_prefix, line))
    }
}

/// Writes the host list to `out`, filtered when a pattern is given
///
/// Without a filter the text is written verbatim.
pub fn write_hosts<W: Write>(
    out: &mut W,
    hosts: &str,
    filter: Option<&PatternFilter>,
) -> io::Result<()> {
    match filter {
        None => out.write_all(hosts.as_bytes())?,
        Some(filter) => {
            for line in filter.apply(hosts) {
                writeln!(out, "{}", line)?;
            }
        }
    }
    out.flush()
}
