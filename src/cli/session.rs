//! Replays command streams against a [`RelationSet`].

use std::io::{BufRead, Write};

use tracing::{debug, info, warn};

use crate::admin;
use crate::config::{Config, ParseErrorPolicy, ReportConfig, ReportFormat, SessionConfig};
use crate::error::{GraphError, Result};
use crate::report::Report;
use crate::storage::RelationSet;

use super::command::{parse_line, Command};

/// Counters describing one [`Session::run`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Input lines read, including blank and skipped ones.
    pub lines: usize,
    /// Commands executed.
    pub commands: usize,
    /// Lines skipped because they did not parse.
    pub skipped: usize,
    /// Report lines written.
    pub reports: usize,
    /// Whether the stream stopped at an explicit `end`.
    pub ended: bool,
}

/// A relation set plus the settings that govern how commands are applied
/// and how reports are rendered.
#[derive(Debug)]
pub struct Session {
    graph: RelationSet,
    report: ReportConfig,
    settings: SessionConfig,
}

impl Session {
    /// Starts a session over an empty relation set.
    pub fn new(config: &Config) -> Self {
        Self {
            graph: RelationSet::new(),
            report: config.report.clone(),
            settings: config.session.clone(),
        }
    }

    /// The relation set built so far.
    pub fn graph(&self) -> &RelationSet {
        &self.graph
    }

    /// Consumes the session, keeping the relation set.
    pub fn into_graph(self) -> RelationSet {
        self.graph
    }

    /// Applies one command.
    ///
    /// Returns the rendered report for `report`, and `None` otherwise.
    pub fn execute(&mut self, command: &Command) -> Result<Option<String>> {
        debug!(%command, "session.command");
        let changed = match command {
            Command::AddEntity(name) => self.graph.add_entity(name),
            Command::DeleteEntity(name) => self.graph.delete_entity(name)?,
            Command::AddRelation {
                source,
                target,
                relation,
            } => self.graph.add_edge(source, target, relation)?,
            Command::DeleteRelation {
                source,
                target,
                relation,
            } => self.graph.delete_edge(source, target, relation)?,
            Command::Report => return self.render(&self.graph.report()?).map(Some),
            Command::End => return Ok(None),
        };
        if changed && self.settings.verify_each_command {
            self.check()?;
        }
        Ok(None)
    }

    /// Reads commands until `end` or end of input, writing one line per
    /// `report` to `output`.
    ///
    /// Lines are read as raw bytes; one that is not valid UTF-8 is handled
    /// like any other unparsable line.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line_no = summary.lines + 1;
            summary.lines = line_no;

            let parsed = std::str::from_utf8(&buf)
                .map_err(|err| GraphError::parse(line_no, format!("invalid UTF-8: {err}")))
                .and_then(|line| parse_line(line, line_no));
            let command = match parsed {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) => match self.settings.on_parse_error {
                    ParseErrorPolicy::Abort => return Err(err),
                    ParseErrorPolicy::Skip => {
                        warn!(line = line_no, error = %err, "session.skip");
                        summary.skipped += 1;
                        continue;
                    }
                },
            };

            if command == Command::End {
                summary.ended = true;
                break;
            }
            summary.commands += 1;
            if let Some(rendered) = self.execute(&command)? {
                writeln!(output, "{rendered}")?;
                summary.reports += 1;
            }
        }
        output.flush()?;
        info!(
            lines = summary.lines,
            commands = summary.commands,
            skipped = summary.skipped,
            reports = summary.reports,
            "session.finished"
        );
        Ok(summary)
    }

    fn render(&self, report: &Report) -> Result<String> {
        match self.report.format {
            ReportFormat::Text => Ok(report.render_text(&self.report.empty_token)),
            ReportFormat::Json => report.render_json(),
        }
    }

    fn check(&self) -> Result<()> {
        let result = admin::verify(&self.graph);
        if result.success {
            return Ok(());
        }
        let message = result.first_error().unwrap_or("verification failed");
        Err(GraphError::corruption(message))
    }
}
