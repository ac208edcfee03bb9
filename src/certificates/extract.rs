// Chain extraction - Selects which certificates of a captured chain are kept
//
// The policy is resolved once from the `--extract-from-chain` tokens and then
// applied to every chain. Only the interactive variant performs I/O, through
// an `IndexPrompt`.

use super::parser::CertificateChain;
use crate::{HarvestError, Result};
use std::fmt;
use std::io::IsTerminal;

/// Selection rule applied to every fetched chain
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExtractionPolicy {
    /// Keep the whole chain
    #[default]
    All,
    /// Keep the leaf only
    First,
    /// Keep the last certificate only
    Last,
    /// Keep the first certificate above the leaf, or the leaf of a single-certificate chain
    CaOrCert,
    /// Keep explicit zero-based positions, in the given order
    Indices(Vec<usize>),
    /// Ask the operator for each chain
    Interactive,
}

/// Named options and their command-line spelling
const NAMED_OPTIONS: &[(&str, ExtractionPolicy)] = &[
    ("all", ExtractionPolicy::All),
    ("first", ExtractionPolicy::First),
    ("last", ExtractionPolicy::Last),
    ("ca-or-cert", ExtractionPolicy::CaOrCert),
    ("interactive", ExtractionPolicy::Interactive),
];

/// Source of operator-selected indices for the interactive policy
pub trait IndexPrompt: Send + Sync {
    /// Return the raw operator answer for the given chain
    fn ask(&self, chain: &CertificateChain) -> Result<String>;
}

/// Prompt on the controlling terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl IndexPrompt for TerminalPrompt {
    fn ask(&self, chain: &CertificateChain) -> Result<String> {
        if !std::io::stdin().is_terminal() {
            return Err(HarvestError::NoConsole);
        }

        let prompt = format!(
            "Which certificates to extract from chain {}?\nInput zero or more indices from 0 to {}",
            chain,
            chain.len().saturating_sub(1)
        );

        let answer = dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        Ok(answer)
    }
}

fn is_index_token(token: &str) -> bool {
    token == "0"
        || (!token.is_empty()
            && !token.starts_with('0')
            && token.chars().all(|c| c.is_ascii_digit()))
}

impl ExtractionPolicy {
    /// Resolve extraction tokens into a policy
    ///
    /// No tokens means `All`. A named option must stand alone; indices may be
    /// repeated and are checked against each chain when applied.
    pub fn from_options<S: AsRef<str>>(options: &[S]) -> Result<Self> {
        let mut named = Vec::new();
        let mut indices = Vec::new();

        for option in options {
            let option = option.as_ref();
            if let Some((_, policy)) = NAMED_OPTIONS
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(option))
            {
                named.push(policy.clone());
            } else if is_index_token(option) {
                let index = option.parse::<usize>().map_err(|_| {
                    HarvestError::UnrecognizedExtractionOption {
                        option: option.to_string(),
                    }
                })?;
                indices.push(index);
            } else {
                return Err(HarvestError::UnrecognizedExtractionOption {
                    option: option.to_string(),
                });
            }
        }

        if named.len() > 1 || (!named.is_empty() && !indices.is_empty()) {
            return Err(HarvestError::IllegalExtractionCombination {
                options: options.iter().map(|o| o.as_ref().to_string()).collect(),
            });
        }

        Ok(match named.pop() {
            Some(policy) => policy,
            None if indices.is_empty() => ExtractionPolicy::All,
            None => ExtractionPolicy::Indices(indices),
        })
    }

    /// Apply the policy, prompting on the terminal for the interactive variant
    pub fn apply(&self, chain: &CertificateChain) -> Result<CertificateChain> {
        self.apply_with(chain, &TerminalPrompt)
    }

    /// Apply the policy with an explicit prompt for the interactive variant
    pub fn apply_with(
        &self,
        chain: &CertificateChain,
        prompt: &dyn IndexPrompt,
    ) -> Result<CertificateChain> {
        if let ExtractionPolicy::Indices(indices) = self {
            return extract_indices(chain, indices);
        }
        if chain.is_empty() {
            return Ok(CertificateChain::default());
        }

        match self {
            ExtractionPolicy::All => Ok(chain.clone()),
            ExtractionPolicy::First => Ok(chain.select(&[0])),
            ExtractionPolicy::Last => Ok(chain.select(&[chain.len() - 1])),
            ExtractionPolicy::CaOrCert => {
                let index = if chain.len() == 1 { 0 } else { 1 };
                Ok(chain.select(&[index]))
            }
            ExtractionPolicy::Indices(indices) => extract_indices(chain, indices),
            ExtractionPolicy::Interactive => {
                let answer = prompt.ask(chain)?;
                let indices = parse_indices(&answer)?;
                extract_indices(chain, &indices)
            }
        }
    }
}

fn extract_indices(chain: &CertificateChain, indices: &[usize]) -> Result<CertificateChain> {
    if let Some(&index) = indices.iter().find(|&&i| i >= chain.len()) {
        return Err(HarvestError::IndexOutOfBounds {
            index,
            chain: chain.simple_names(),
        });
    }
    Ok(chain.select(indices))
}

/// Parse whitespace-separated indices; blank input selects nothing
fn parse_indices(input: &str) -> Result<Vec<usize>> {
    input
        .split_whitespace()
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| HarvestError::InvalidCertificateIndex {
                    input: token.to_string(),
                })
        })
        .collect()
}

impl fmt::Display for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionPolicy::Indices(indices) => {
                let list: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                write!(f, "indices {}", list.join(" "))
            }
            named => {
                let name = NAMED_OPTIONS
                    .iter()
                    .find(|(_, policy)| policy == named)
                    .map(|(name, _)| *name)
                    .unwrap_or("all");
                f.write_str(name)
            }
        }
    }
}
