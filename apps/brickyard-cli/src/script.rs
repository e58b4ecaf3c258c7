use anyhow::{Context, bail};
use brickyard_input::Key;
use std::str::FromStr;

/// One entry of a key script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Press and release within a single tick.
    Tap(Key),
    /// Hold for `n` ticks, then release.
    Hold(Key, u32),
    /// `n` ticks with no key change.
    Wait(u32),
}

impl Step {
    pub fn ticks(&self) -> u32 {
        match *self {
            Step::Tap(_) => 1,
            Step::Hold(_, n) | Step::Wait(n) => n,
        }
    }
}

impl FromStr for Step {
    type Err = anyhow::Error;

    /// `e`, `w*40` or `wait*30`.
    fn from_str(token: &str) -> anyhow::Result<Self> {
        let (name, count) = match token.split_once('*') {
            Some((name, n)) => {
                let n: u32 = n
                    .parse()
                    .with_context(|| format!("bad repeat count in {token:?}"))?;
                if n == 0 {
                    bail!("repeat count must be positive in {token:?}");
                }
                (name, Some(n))
            }
            None => (token, None),
        };
        if name.eq_ignore_ascii_case("wait") {
            return Ok(Step::Wait(count.unwrap_or(1)));
        }
        let key: Key = name.parse()?;
        Ok(match count {
            Some(n) => Step::Hold(key, n),
            None => Step::Tap(key),
        })
    }
}

/// Whitespace-separated steps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn total_ticks(&self) -> u64 {
        self.steps.iter().map(|s| u64::from(s.ticks())).sum()
    }
}

impl FromStr for Script {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> anyhow::Result<Self> {
        let steps = text
            .split_whitespace()
            .map(str::parse)
            .collect::<anyhow::Result<Vec<Step>>>()?;
        Ok(Self { steps })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_token_kinds() {
        let script: Script = "a*23 W*40 f wait*5 wait e".parse().unwrap();
        assert_eq!(
            script.steps,
            vec![
                Step::Hold(Key::A, 23),
                Step::Hold(Key::W, 40),
                Step::Tap(Key::F),
                Step::Wait(5),
                Step::Wait(1),
                Step::Tap(Key::E),
            ]
        );
        assert_eq!(script.total_ticks(), 23 + 40 + 1 + 5 + 1 + 1);
    }

    #[test]
    fn rejects_bad_tokens() {
        assert!("q".parse::<Script>().is_err());
        assert!("w*x".parse::<Script>().is_err());
        assert!("w*0".parse::<Script>().is_err());
    }

    #[test]
    fn empty_script_is_empty() {
        let script: Script = "   ".parse().unwrap();
        assert!(script.steps.is_empty());
        assert_eq!(script.total_ticks(), 0);
    }
}
