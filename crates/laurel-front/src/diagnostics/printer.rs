//! Renders collected diagnostics against unit sources.

use std::fmt::Write;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use laurel_core::Span;

use crate::env::Environment;
use crate::error::ResolutionError;

use super::{Diagnostic, Diagnostics, Severity};

pub struct DiagnosticsPrinter<'d, 'e> {
    diagnostics: &'d Diagnostics,
    env: &'e Environment,
    colored: bool,
}

impl<'d, 'e> DiagnosticsPrinter<'d, 'e> {
    pub fn new(diagnostics: &'d Diagnostics, env: &'e Environment) -> Self {
        Self {
            diagnostics,
            env,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        if self.diagnostics.is_empty() {
            return Ok(());
        }

        let renderer = if self.colored {
            Renderer::styled()
        } else {
            Renderer::plain()
        };

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }
            write!(w, "{}", renderer.render(&self.report_for(diag)))?;
        }
        Ok(())
    }

    fn report_for(&self, diag: &Diagnostic) -> Vec<Group<'_>> {
        let unit = self.env.unit(diag.unit);
        let message = diag.message();
        let range = adjust_range(diag.span, unit.source.len());

        let mut snippet = Snippet::source(unit.source.as_str())
            .line_start(1)
            .path(unit.name.as_str())
            .annotation(AnnotationKind::Primary.span(range).label(message.clone()));

        // Same-unit related locations join the primary snippet; others get
        // their own snippet below.
        let mut foreign = Vec::new();
        for related in &diag.related {
            if related.unit == diag.unit {
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(adjust_range(related.span, unit.source.len()))
                        .label(related.message.clone()),
                );
            } else {
                foreign.push(related);
            }
        }

        let level = severity_to_level(diag.severity);
        let mut title_group = level.primary_title(message.clone()).element(snippet);

        for related in foreign {
            let other = self.env.unit(related.unit);
            title_group = title_group.element(
                Snippet::source(other.source.as_str())
                    .line_start(1)
                    .path(other.name.as_str())
                    .annotation(
                        AnnotationKind::Context
                            .span(adjust_range(related.span, other.source.len()))
                            .label(related.message.clone()),
                    ),
            );
        }

        let mut report = vec![title_group];
        if let Some(help) = suggestion_help(&diag.error) {
            report.push(Group::with_title(Level::HELP.secondary_title(help)));
        }
        report
    }
}

fn suggestion_help(error: &ResolutionError) -> Option<String> {
    match error {
        ResolutionError::UndefinedSymbol { suggestions, .. } if !suggestions.is_empty() => {
            let list = suggestions
                .iter()
                .map(|s| format!("`{s}`"))
                .collect::<Vec<_>>()
                .join(", ");
            Some(format!("did you mean {list}?"))
        }
        _ => None,
    }
}

fn severity_to_level(severity: Severity) -> Level<'static> {
    match severity {
        Severity::Error => Level::ERROR,
        Severity::Warning => Level::WARNING,
    }
}

fn adjust_range(span: Span, limit: usize) -> std::ops::Range<usize> {
    let start = span.start as usize;
    let end = span.end as usize;
    // Zero-width spans widen to one character for visibility.
    if start == end {
        start..(start + 1).min(limit)
    } else {
        start..end.min(limit.max(start))
    }
}

impl Diagnostics {
    pub fn printer<'d, 'e>(&'d self, env: &'e Environment) -> DiagnosticsPrinter<'d, 'e> {
        DiagnosticsPrinter::new(self, env)
    }
}
