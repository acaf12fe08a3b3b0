//! The compiler driver: composable unit transforms.
//!
//! A unit transform takes one unit from one state to the next in the
//! context of its environment. The driver lifts each transform over every
//! unit of every namespace ("module transform") and runs the transforms
//! left to right. A unit that errors freezes at its current state; its
//! siblings continue. The only IO in the whole front-end happens in the
//! `read` transform and the loader.

use crate::diagnostics::Diagnostics;
use crate::env::{Environment, NamespaceId};
use crate::error::{CompileError, IoError, Result};
use crate::lexer;
use crate::parser;
use crate::resolve::{ResolveStage1, ResolveStage2};
use crate::unit::{UnitId, UnitOrigin, UnitState};

pub trait UnitTransform {
    fn name(&self) -> &'static str;

    /// State a unit must be in for this transform to pick it up.
    fn from_state(&self) -> UnitState;

    /// State the driver advances the unit to on success.
    fn to_state(&self) -> UnitState;

    /// Runs once per transform before any unit; returns the namespace
    /// visit order. Defaults to environment order.
    fn prepare(&self, env: &mut Environment, diag: &mut Diagnostics) -> Vec<NamespaceId> {
        let _ = diag;
        env.ids().collect()
    }

    fn apply(&self, env: &mut Environment, unit: UnitId, diag: &mut Diagnostics) -> Result<()>;
}

/// `Raw -> Read`: materialize the unit's source text.
pub struct Read;

impl UnitTransform for Read {
    fn name(&self) -> &'static str {
        "read"
    }

    fn from_state(&self) -> UnitState {
        UnitState::Raw
    }

    fn to_state(&self) -> UnitState {
        UnitState::Read
    }

    fn apply(&self, env: &mut Environment, unit: UnitId, _diag: &mut Diagnostics) -> Result<()> {
        let target = env.unit_mut(unit);
        target.source = match target.origin() {
            UnitOrigin::Memory(source) => source.clone(),
            UnitOrigin::File(path) => std::fs::read_to_string(path)
                .map_err(|e| IoError::new(path.display().to_string(), e))?,
        };
        Ok(())
    }
}

/// `Read -> Lexed`: source text to tokens.
pub struct Lex;

impl UnitTransform for Lex {
    fn name(&self) -> &'static str {
        "lex"
    }

    fn from_state(&self) -> UnitState {
        UnitState::Read
    }

    fn to_state(&self) -> UnitState {
        UnitState::Lexed
    }

    fn apply(&self, env: &mut Environment, unit: UnitId, _diag: &mut Diagnostics) -> Result<()> {
        let target = env.unit_mut(unit);
        let tokens = lexer::lex(&target.source)?;
        target.tokens = Some(tokens);
        Ok(())
    }
}

/// `Lexed -> Parsed`: tokens to a compilation unit AST.
pub struct Parse;

impl UnitTransform for Parse {
    fn name(&self) -> &'static str {
        "parse"
    }

    fn from_state(&self) -> UnitState {
        UnitState::Lexed
    }

    fn to_state(&self) -> UnitState {
        UnitState::Parsed
    }

    fn apply(&self, env: &mut Environment, unit: UnitId, _diag: &mut Diagnostics) -> Result<()> {
        let ast = {
            let target = env.unit(unit);
            let tokens = target
                .tokens
                .as_ref()
                .ok_or_else(|| CompileError::internal("parse ran before lex"))?;
            parser::parse_unit(tokens)?
        };
        env.unit_mut(unit).ast = Some(ast);
        Ok(())
    }
}

/// Ordered list of unit transforms, applied left to right across the
/// whole environment.
pub struct Pipeline {
    transforms: Vec<Box<dyn UnitTransform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    pub fn then(mut self, transform: impl UnitTransform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// The full front-end: read, lex, parse, resolve stage 1 and 2.
    pub fn full() -> Self {
        Self::new()
            .then(Read)
            .then(Lex)
            .then(Parse)
            .then(ResolveStage1)
            .then(ResolveStage2)
    }

    /// Syntax only: read, lex, parse.
    pub fn syntax() -> Self {
        Self::new().then(Read).then(Lex).then(Parse)
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    fn final_state(&self) -> Option<UnitState> {
        self.transforms.last().map(|t| t.to_state())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::full()
    }
}

/// Outcome of one `compile_with` run.
#[derive(Debug)]
pub struct CompileReport {
    /// Fatal per-unit errors (lex, parse, internal, IO).
    pub errors: Vec<(UnitId, CompileError)>,
    /// Non-fatal resolution diagnostics.
    pub diagnostics: Diagnostics,
    /// Every unit reached the pipeline's final state.
    pub complete: bool,
}

impl CompileReport {
    pub fn is_success(&self) -> bool {
        self.complete && self.errors.is_empty() && !self.diagnostics.has_errors()
    }

    /// Collapses the report into the first fatal or resolution error.
    pub fn into_result(mut self) -> Result<()> {
        if let Some((_, error)) = self.errors.drain(..).next() {
            return Err(error);
        }
        if let Some(diag) = self.diagnostics.iter().find(|d| d.is_error()) {
            return Err(CompileError::Resolution(diag.error.clone()));
        }
        if !self.complete {
            return Err(CompileError::internal("compilation did not complete"));
        }
        Ok(())
    }
}

impl Environment {
    /// Applies each transform to every unit of every namespace, in the
    /// namespace order the transform requests. Units that error freeze at
    /// their current state; compilation succeeds only when every unit
    /// reaches the final state.
    pub fn compile_with(&mut self, pipeline: &Pipeline) -> CompileReport {
        let mut diag = Diagnostics::new();
        let mut errors = Vec::new();

        for transform in &pipeline.transforms {
            let order = transform.prepare(self, &mut diag);
            for ns in order {
                let unit_count = self.namespace(ns).module.len() as u32;
                for index in 0..unit_count {
                    let unit = UnitId {
                        namespace: ns,
                        index,
                    };
                    if self.unit(unit).state() != transform.from_state() {
                        continue; // frozen earlier, or not part of this run
                    }
                    let errors_before = diag.error_count_for(unit);
                    match transform.apply(self, unit, &mut diag) {
                        Ok(()) => {
                            if diag.error_count_for(unit) == errors_before {
                                self.unit_mut(unit).advance(transform.to_state());
                            }
                        }
                        Err(error) => errors.push((unit, error)),
                    }
                }
            }
        }

        let complete = match pipeline.final_state() {
            Some(state) => self
                .unit_ids()
                .into_iter()
                .all(|unit| self.unit(unit).state() == state),
            None => true,
        };

        CompileReport {
            errors,
            diagnostics: diag,
            complete,
        }
    }

    /// Runs the full front-end pipeline.
    pub fn compile(&mut self) -> CompileReport {
        self.compile_with(&Pipeline::full())
    }
}
