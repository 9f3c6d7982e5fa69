/*
    This module parses derivation paths passed in as strings
    into lists of ChildOptions that can be used to derive a child key.

    Grammar: ("m/")? (digits "'"? "/")* digits "'"?
    A bare "m" is the master key itself. A segment without the
    hardened mark must be below 2^31, so "2147483648" never stands
    in for "0'".
*/

use std::{fmt, str::FromStr};

use crate::hdwallet::{
    ckd::is_hardened,
    ChildOptions,
    HDWError
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Path starts at the master key ("m/...")
    pub root: bool,
    pub children: Vec<ChildOptions>
}

impl FromStr for Path {
    type Err = HDWError;

    fn from_str(path: &str) -> Result<Self, HDWError> {
        let bad_path = || HDWError::InvalidPath(path.to_string());

        if path == "m" {
            return Ok(Self { root: true, children: vec![] })
        }
        let (root, rest) = match path.strip_prefix("m/") {
            Some(x) => (true, x),
            None => (false, path)
        };
        if rest.is_empty() {
            return Err(bad_path())
        }

        let children = rest
            .split('/')
            .map(|segment| parse_segment(segment).ok_or_else(bad_path))
            .collect::<Result<Vec<ChildOptions>, HDWError>>()?;

        Ok(Self {
            root,
            children
        })
    }
}

/**
    Parses one segment: unsigned decimal digits with an optional trailing '
*/
fn parse_segment(segment: &str) -> Option<ChildOptions> {
    let (digits, hardened) = match segment.strip_suffix('\'') {
        Some(x) => (x, true),
        None => (segment, false)
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None
    }

    //Digits that overflow u32 are not a valid index
    let index: u32 = digits.parse().ok()?;
    if hardened {
        Some(ChildOptions::Hardened(index))
    } else if is_hardened(index) {
        None
    } else {
        Some(ChildOptions::Normal(index))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut parts: Vec<String> = vec![];
        if self.root {
            parts.push("m".to_string());
        }
        for child in &self.children {
            parts.push(match child {
                ChildOptions::Normal(x) => format!("{}", x),
                ChildOptions::Hardened(x) => format!("{}'", x)
            });
        }

        write!(f, "{}", parts.join("/"))
    }
}
