//! Debugger session state
//!
//! All state the display layer shows lives in one [`Session`] value. The
//! only way to change it is [`Session::reduce`], which consumes the old
//! state and an [`Action`] and returns the new state. Derived values (the
//! comparison) are recomputed inside the reducer whenever their inputs
//! change, so a snapshot is always self-consistent.

use serde::Serialize;

use super::analysis::{AnalysisRequest, Suggestion};
use super::fixtures::{PYTHON_SOURCE, PYTHON_ZETAS, REFERENCE_SOURCE, REFERENCE_ZETAS};
use crate::compare::{compare_tables, ChartSeries, Comparison};
use crate::config::DebuggerConfig;
use crate::error::{Result, ZetaError};
use crate::ntt::params::ModulusParams;
use crate::ntt::twiddle::generate_zetas;

// ============================================================================
// Collaborator-facing Types
// ============================================================================

/// Contents of one text editor
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceBuffer {
    pub text: String,
    pub read_only: bool,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>, read_only: bool) -> Self {
        Self {
            text: text.into(),
            read_only,
        }
    }

    /// Replace the text unless the buffer is read-only. Returns whether
    /// the edit was applied.
    pub fn edit(&mut self, text: String) -> bool {
        if self.read_only {
            return false;
        }
        self.text = text;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Message for the notification widget
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub enum AnalysisState {
    #[default]
    Idle,
    Running,
    Ready(Suggestion),
    Failed(String),
}

/// Badge shown above the tables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    Match,
    Mismatch,
    /// Tables could not be compared (length mismatch)
    Incomparable,
}

/// First few raw values of each table
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub python: Vec<i16>,
    pub reference: Vec<i16>,
}

// ============================================================================
// Actions
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    EditPythonSource(String),
    EditReferenceSource(String),
    SetPythonZetas(Vec<i16>),
    SetReferenceZetas(Vec<i16>),
    /// Replace the python table with the generated Montgomery-form table
    Regenerate,
    AnalysisStarted,
    AnalysisFinished(Result<Suggestion>),
    DismissNotices,
}

// ============================================================================
// Session
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    config: DebuggerConfig,
    params: ModulusParams,
    python_source: SourceBuffer,
    reference_source: SourceBuffer,
    python_zetas: Vec<i16>,
    reference_zetas: Vec<i16>,
    comparison: Option<Comparison>,
    analysis: AnalysisState,
    notices: Vec<Notice>,
}

impl Session {
    /// Start a session from the fixture tables and sources.
    pub fn new(config: DebuggerConfig) -> Result<Self> {
        let params = config.params()?;
        params.validate()?;
        let session = Self {
            python_source: SourceBuffer::new(PYTHON_SOURCE, false),
            reference_source: SourceBuffer::new(REFERENCE_SOURCE, config.reference_read_only),
            python_zetas: PYTHON_ZETAS.to_vec(),
            reference_zetas: REFERENCE_ZETAS.to_vec(),
            comparison: None,
            analysis: AnalysisState::Idle,
            notices: Vec::new(),
            config,
            params,
        };
        Ok(session.recompare())
    }

    /// Apply one action.
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::EditPythonSource(text) => {
                self.python_source.edit(text);
                self
            }
            Action::EditReferenceSource(text) => {
                if !self.reference_source.edit(text) {
                    tracing::debug!("ignored edit to read-only reference source");
                }
                self
            }
            Action::SetPythonZetas(zetas) => {
                self.python_zetas = zetas;
                self.recompare()
            }
            Action::SetReferenceZetas(zetas) => {
                self.reference_zetas = zetas;
                self.recompare()
            }
            Action::Regenerate => match generate_zetas(&self.params) {
                Ok(table) => {
                    self.python_zetas = table.montgomery_form();
                    self.notify(
                        Severity::Info,
                        format!("regenerated {} zetas for {}", table.len(), self.params.name),
                    );
                    self.recompare()
                }
                Err(e) => {
                    self.notify(Severity::Error, e.to_string());
                    self
                }
            },
            Action::AnalysisStarted => {
                if self.analysis != AnalysisState::Running {
                    tracing::info!(params = self.params.name, "analysis started");
                    self.analysis = AnalysisState::Running;
                }
                self
            }
            Action::AnalysisFinished(_) if self.analysis != AnalysisState::Running => {
                tracing::debug!("dropped analysis result with no request in flight");
                self
            }
            Action::AnalysisFinished(result) => {
                self.analysis = match result {
                    Ok(suggestion) => {
                        self.notify(Severity::Success, "analysis complete");
                        AnalysisState::Ready(suggestion)
                    }
                    Err(ZetaError::Cancelled) => {
                        self.notify(Severity::Info, "analysis cancelled");
                        AnalysisState::Idle
                    }
                    Err(e) => {
                        let message = e.to_string();
                        self.notify(Severity::Error, message.clone());
                        AnalysisState::Failed(message)
                    }
                };
                self
            }
            Action::DismissNotices => {
                self.notices.clear();
                self
            }
        }
    }

    fn recompare(mut self) -> Self {
        match compare_tables(&self.python_zetas, &self.reference_zetas) {
            Ok(comparison) => self.comparison = Some(comparison),
            Err(e) => {
                tracing::warn!(error = %e, "tables cannot be compared");
                self.comparison = None;
                self.notify(Severity::Error, e.to_string());
            }
        }
        self
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notices.push(Notice::new(severity, message));
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn config(&self) -> &DebuggerConfig {
        &self.config
    }

    pub fn params(&self) -> &ModulusParams {
        &self.params
    }

    pub fn python_source(&self) -> &SourceBuffer {
        &self.python_source
    }

    pub fn reference_source(&self) -> &SourceBuffer {
        &self.reference_source
    }

    pub fn python_zetas(&self) -> &[i16] {
        &self.python_zetas
    }

    pub fn reference_zetas(&self) -> &[i16] {
        &self.reference_zetas
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn status(&self) -> MatchStatus {
        match &self.comparison {
            Some(c) if c.is_match() => MatchStatus::Match,
            Some(_) => MatchStatus::Mismatch,
            None => MatchStatus::Incomparable,
        }
    }

    /// Chart data for the leading window, if the tables are comparable
    pub fn chart(&self) -> Option<ChartSeries> {
        self.comparison.as_ref().map(|c| {
            ChartSeries::new(
                &self.python_zetas,
                &self.reference_zetas,
                c,
                self.config.chart_window,
            )
        })
    }

    pub fn preview(&self) -> Preview {
        let n = self.config.preview_len;
        Preview {
            python: self.python_zetas.iter().take(n).copied().collect(),
            reference: self.reference_zetas.iter().take(n).copied().collect(),
        }
    }

    /// Snapshot of what an analyzer needs
    pub fn analysis_request(&self) -> AnalysisRequest {
        AnalysisRequest {
            python_source: self.python_source.text.clone(),
            reference_source: self.reference_source.text.clone(),
            python_zetas: self.python_zetas.clone(),
            reference_zetas: self.reference_zetas.clone(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debugger::analysis::{spawn_analysis, TableAnalyzer};
    use std::sync::Arc;

    fn session() -> Session {
        Session::new(DebuggerConfig::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let s = session();
        assert_eq!(s.status(), MatchStatus::Mismatch);
        let c = s.comparison().unwrap();
        assert_eq!(c.mismatch_count(), 1);
        assert_eq!(c.mismatches()[0].index, 64);
        assert_eq!(s.analysis(), &AnalysisState::Idle);
        assert!(s.notices().is_empty());
        assert!(s.reference_source().read_only);
    }

    #[test]
    fn test_unknown_preset_fails() {
        let config = DebuggerConfig {
            preset: "nope".into(),
            ..Default::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(ZetaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_read_only_reference_ignores_edits() {
        let s = session().reduce(Action::EditReferenceSource("int main() {}".into()));
        assert_eq!(s.reference_source().text, REFERENCE_SOURCE);

        let s = s.reduce(Action::EditPythonSource("print(1)".into()));
        assert_eq!(s.python_source().text, "print(1)");
    }

    #[test]
    fn test_writable_reference_accepts_edits() {
        let config = DebuggerConfig {
            reference_read_only: false,
            ..Default::default()
        };
        let s = Session::new(config)
            .unwrap()
            .reduce(Action::EditReferenceSource("int main() {}".into()));
        assert_eq!(s.reference_source().text, "int main() {}");
    }

    #[test]
    fn test_fixing_table_recomputes_comparison() {
        let s = session().reduce(Action::SetReferenceZetas(PYTHON_ZETAS.to_vec()));
        assert_eq!(s.status(), MatchStatus::Match);
        assert_eq!(s.comparison().unwrap().max_abs_diff(), 0);
    }

    #[test]
    fn test_length_mismatch_raises_notice() {
        let s = session().reduce(Action::SetPythonZetas(vec![1, 2, 3, 4, 5]));
        assert_eq!(s.status(), MatchStatus::Incomparable);
        assert!(s.comparison().is_none());
        assert!(s.chart().is_none());
        assert_eq!(s.notices().len(), 1);
        assert_eq!(s.notices()[0].severity, Severity::Error);
        assert!(s.notices()[0].message.contains("length mismatch"));

        let s = s.reduce(Action::DismissNotices);
        assert!(s.notices().is_empty());
    }

    #[test]
    fn test_regenerate_is_deterministic() {
        let a = session().reduce(Action::Regenerate);
        let b = session().reduce(Action::Regenerate);
        assert_eq!(a.python_zetas(), b.python_zetas());
        assert_eq!(a.python_zetas().len(), 128);
        assert_eq!(&a.python_zetas()[..65], PYTHON_ZETAS);
        // 128 generated entries vs the 65-entry reference capture
        assert_eq!(a.status(), MatchStatus::Incomparable);

        let fixed = a.clone().reduce(Action::SetReferenceZetas(b.python_zetas().to_vec()));
        assert_eq!(fixed.status(), MatchStatus::Match);
    }

    #[test]
    fn test_chart_and_preview() {
        let s = session();
        let chart = s.chart().unwrap();
        assert_eq!(chart.labels.len(), 32);
        assert_eq!(chart.python, &PYTHON_ZETAS[..32]);

        let preview = s.preview();
        assert_eq!(preview.python, &PYTHON_ZETAS[..8]);
        assert_eq!(preview.reference, &REFERENCE_ZETAS[..8]);
    }

    #[test]
    fn test_analysis_lifecycle() {
        let s = session().reduce(Action::AnalysisStarted);
        assert_eq!(s.analysis(), &AnalysisState::Running);

        let handle = spawn_analysis(Arc::new(TableAnalyzer::new(*s.params())), s.analysis_request());
        let s = s.reduce(Action::AnalysisFinished(handle.wait()));
        match s.analysis() {
            AnalysisState::Ready(suggestion) => {
                assert!(suggestion.text.contains("index 64"));
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(s.notices().last().unwrap().severity, Severity::Success);
    }

    #[test]
    fn test_analysis_failure_and_cancel() {
        let s = session()
            .reduce(Action::AnalysisStarted)
            .reduce(Action::AnalysisFinished(Err(ZetaError::AnalysisFailed(
                "service unavailable".into(),
            ))));
        assert!(matches!(s.analysis(), AnalysisState::Failed(msg) if msg.contains("unavailable")));
        assert_eq!(s.notices().last().unwrap().severity, Severity::Error);

        let s = s
            .reduce(Action::AnalysisStarted)
            .reduce(Action::AnalysisFinished(Err(ZetaError::Cancelled)));
        assert_eq!(s.analysis(), &AnalysisState::Idle);
        assert_eq!(s.notices().last().unwrap().severity, Severity::Info);
    }

    #[test]
    fn test_stale_analysis_result_ignored() {
        let late = || {
            Action::AnalysisFinished(Ok(Suggestion::new("## Analysis Results\n\nold run")))
        };

        let idle = session().reduce(late());
        assert_eq!(idle.analysis(), &AnalysisState::Idle);
        assert!(idle.notices().is_empty());

        let cancelled = session()
            .reduce(Action::AnalysisStarted)
            .reduce(Action::AnalysisFinished(Err(ZetaError::Cancelled)))
            .reduce(late());
        assert_eq!(cancelled.analysis(), &AnalysisState::Idle);
        assert_eq!(cancelled.notices().len(), 1);

        let ready = session()
            .reduce(Action::AnalysisStarted)
            .reduce(Action::AnalysisFinished(Ok(Suggestion::new("fresh"))))
            .reduce(late());
        assert_eq!(
            ready.analysis(),
            &AnalysisState::Ready(Suggestion::new("fresh"))
        );
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(session()).unwrap();
        assert_eq!(json["params"]["q"], 3329);
        assert_eq!(json["comparison"]["mismatches"][0]["index"], 64);
        assert_eq!(json["analysis"], "Idle");
    }
}
