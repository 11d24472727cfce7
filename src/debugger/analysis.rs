//! Analysis of a python/reference pair
//!
//! The request/response contract is transport-agnostic: an
//! [`Analyzer`] receives both sources and both tables and answers with a
//! free-text [`Suggestion`] that may contain fenced code blocks. A remote
//! service plugs in behind the same trait. [`TableAnalyzer`] is the local
//! implementation: it recomputes the correct table and explains each
//! mismatch against it.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compare::{compare_tables, Mismatch};
use crate::error::{Result, ZetaError};
use crate::ntt::params::ModulusParams;
use crate::ntt::twiddle::generate_zetas;
use crate::task::{CancelToken, TaskHandle};

// ============================================================================
// Contract
// ============================================================================

/// Everything an analyzer gets to look at
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub python_source: String,
    pub reference_source: String,
    pub python_zetas: Vec<i16>,
    pub reference_zetas: Vec<i16>,
}

/// Free-text answer, markdown-ish
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub text: String,
}

/// One structural piece of a [`Suggestion`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Block {
    Heading { level: u8, text: String },
    Bullet(String),
    Paragraph(String),
    Code { language: Option<String>, body: String },
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Split into headings, bullets, paragraphs and fenced code.
    ///
    /// Blank lines outside code are dropped. An unterminated fence runs to
    /// the end of the text.
    pub fn blocks(&self) -> Vec<Block> {
        let mut blocks = Vec::new();
        let mut fence: Option<(Option<String>, Vec<&str>)> = None;

        for line in self.text.lines() {
            if let Some(info) = line.trim_start().strip_prefix("```") {
                match fence.take() {
                    Some((language, body)) => blocks.push(Block::Code {
                        language,
                        body: body.join("\n"),
                    }),
                    None => {
                        let info = info.trim();
                        fence = Some(((!info.is_empty()).then(|| info.to_string()), Vec::new()));
                    }
                }
                continue;
            }
            if let Some((_, body)) = fence.as_mut() {
                body.push(line);
                continue;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let hashes = trimmed.chars().take_while(|&c| c == '#').count();
            if (1..=6).contains(&hashes) && trimmed[hashes..].starts_with(' ') {
                blocks.push(Block::Heading {
                    level: hashes as u8,
                    text: trimmed[hashes..].trim().to_string(),
                });
            } else if let Some(item) = trimmed.strip_prefix("- ") {
                blocks.push(Block::Bullet(item.to_string()));
            } else {
                blocks.push(Block::Paragraph(trimmed.to_string()));
            }
        }

        if let Some((language, body)) = fence {
            blocks.push(Block::Code {
                language,
                body: body.join("\n"),
            });
        }
        blocks
    }

    /// Bodies of all fenced code blocks, in order
    pub fn code_blocks(&self) -> Vec<String> {
        self.blocks()
            .into_iter()
            .filter_map(|block| match block {
                Block::Code { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }
}

/// Something that can turn a request into a suggestion.
///
/// Implementations should poll `cancel` between expensive steps.
pub trait Analyzer: Send + Sync {
    fn analyze(&self, request: &AnalysisRequest, cancel: &CancelToken) -> Result<Suggestion>;
}

/// Run `analyzer` on a background thread.
pub fn spawn_analysis(
    analyzer: Arc<dyn Analyzer>,
    request: AnalysisRequest,
) -> TaskHandle<Suggestion> {
    TaskHandle::spawn(move |cancel| {
        let suggestion = analyzer.analyze(&request, cancel)?;
        tracing::info!(chars = suggestion.text.len(), "analysis finished");
        Ok(suggestion)
    })
}

// ============================================================================
// Local Analyzer
// ============================================================================

/// Which side of a mismatch agrees with the recomputed table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verdict {
    PythonCorrect,
    ReferenceCorrect,
    NeitherCorrect,
    /// Index beyond the table the parameters generate
    Unknown,
}

/// Explains mismatches by regenerating the table for `params`.
///
/// Tables are interpreted in Montgomery form, canonical in [0, Q).
#[derive(Clone, Copy, Debug)]
pub struct TableAnalyzer {
    pub params: ModulusParams,
}

impl TableAnalyzer {
    pub fn new(params: ModulusParams) -> Self {
        Self { params }
    }

    fn verdict(expected: Option<i16>, m: &Mismatch) -> Verdict {
        match expected {
            None => Verdict::Unknown,
            Some(e) if e == m.python => Verdict::PythonCorrect,
            Some(e) if e == m.reference => Verdict::ReferenceCorrect,
            Some(_) => Verdict::NeitherCorrect,
        }
    }

    /// Off by a multiple of Q: right residue, wrong representative
    fn same_residue(&self, a: i16, b: i16) -> bool {
        (i32::from(a) - i32::from(b)).rem_euclid(self.params.q as i32) == 0
    }
}

impl Analyzer for TableAnalyzer {
    fn analyze(&self, request: &AnalysisRequest, cancel: &CancelToken) -> Result<Suggestion> {
        cancel.check()?;
        let comparison = compare_tables(&request.python_zetas, &request.reference_zetas)?;
        let expected = generate_zetas(&self.params)
            .map_err(|e| ZetaError::AnalysisFailed(e.to_string()))?
            .montgomery_form();
        cancel.check()?;

        let p = &self.params;
        let mut out = String::new();
        // fmt::Write into a String cannot fail
        let _ = writeln!(out, "## Analysis Results\n");
        let _ = writeln!(
            out,
            "Compared {} entries against {} (q = {}, n = {}).",
            comparison.len(),
            p.name,
            p.q,
            p.n
        );

        if comparison.is_match() {
            let agrees = request.python_zetas.iter().zip(&expected).all(|(a, b)| a == b)
                && request.python_zetas.len() <= expected.len();
            let _ = writeln!(out, "\n### Tables Agree\n");
            let _ = writeln!(
                out,
                "{}",
                if agrees {
                    "Both tables match each other and the recomputed table."
                } else {
                    "Both tables match each other but not the recomputed table; check the parameters."
                }
            );
            return Ok(Suggestion::new(out));
        }

        let _ = writeln!(
            out,
            "{} mismatches, max |delta| = {}.\n\n### Mismatches\n",
            comparison.mismatch_count(),
            comparison.max_abs_diff()
        );

        let mut python_wrong = 0usize;
        let mut representative_only = 0usize;
        for m in comparison.mismatches() {
            cancel.check()?;
            let want = expected.get(m.index).copied();
            let verdict = Self::verdict(want, m);
            let note = match verdict {
                Verdict::PythonCorrect => "reference side disagrees with the recomputed value",
                Verdict::ReferenceCorrect => "python side disagrees with the recomputed value",
                Verdict::NeitherCorrect => "neither side matches the recomputed value",
                Verdict::Unknown => "index is beyond the recomputed table",
            };
            if matches!(verdict, Verdict::ReferenceCorrect | Verdict::NeitherCorrect) {
                python_wrong += 1;
                if want.is_some_and(|w| self.same_residue(w, m.python)) {
                    representative_only += 1;
                }
            }
            let computed = want.map_or_else(|| "n/a".to_string(), |w| w.to_string());
            let _ = writeln!(
                out,
                "- index {}: python {}, reference {}, delta {}, computed {}: {}",
                m.index, m.python, m.reference, m.delta, computed, note
            );
        }

        let _ = writeln!(out, "\n### Diagnosis\n");
        if python_wrong == 0 {
            let _ = writeln!(
                out,
                "Every python value matches the recomputed table; the reference capture is suspect."
            );
        } else {
            let _ = writeln!(
                out,
                "{python_wrong} python values disagree with the recomputed table; \
                 {representative_only} of them have the right residue mod q but the wrong representative."
            );
        }

        if representative_only > 0 {
            let _ = writeln!(out, "\n### Suggested Fix\n");
            let _ = writeln!(
                out,
                "Reinterpret the low half as a signed 16-bit value before multiplying back by q:\n"
            );
            let _ = writeln!(
                out,
                "```python\n\
                 def montgomery_reduce(a):\n    \
                     t = (a * QINV) & 0xFFFF\n    \
                     if t >= 0x8000:\n        \
                         t -= 0x10000\n    \
                     return (a - t * Q) >> 16\n\
                 ```"
            );
        }

        Ok(Suggestion::new(out))
    }
}

// ============================================================================
// Tests
// ============================================================================
