//! Resolver stage 1: declaration and import collection.
//!
//! Walks each unit's AST once, inserting bindings into the owning
//! namespace's symbol table, registering imports, and recording dependency
//! edges. Block and lambda scopes are allocated here and stamped into the
//! node metadata so stage 2 re-enters the same scopes. Use sites are
//! deferred entirely.

use crate::ast::{AstNode, Expression, Statement};
use crate::diagnostics::Diagnostics;
use crate::env::namespace::{Import, ImportTable};
use crate::env::{Binding, BindingKind, Environment, NamespaceId, ScopeId, SymbolTable};
use crate::error::{CompileError, ResolutionError, Result};
use crate::pipeline::UnitTransform;
use crate::resolve::deps::{DependencyGraph, EdgeInfo};
use crate::unit::{UnitId, UnitState};

pub struct ResolveStage1;

impl UnitTransform for ResolveStage1 {
    fn name(&self) -> &'static str {
        "resolve_stage_1"
    }

    fn from_state(&self) -> UnitState {
        UnitState::Parsed
    }

    fn to_state(&self) -> UnitState {
        UnitState::PartiallyResolved
    }

    fn prepare(&self, env: &mut Environment, _diag: &mut Diagnostics) -> Vec<NamespaceId> {
        env.deps.reset(env.ids());
        env.ids().collect()
    }

    fn apply(&self, env: &mut Environment, unit: UnitId, diag: &mut Diagnostics) -> Result<()> {
        let ns = unit.namespace;

        // The walker inserts into these while reading the environment, so
        // they move out for the duration of the walk.
        let mut symbols = std::mem::take(&mut env.namespace_mut(ns).symbols);
        let mut imports = std::mem::take(&mut env.namespace_mut(ns).imports);
        let mut deps = std::mem::take(&mut env.deps);

        let result = match env.unit(unit).ast.as_ref() {
            Some(ast) => {
                let mut collector = Collector {
                    env: &*env,
                    unit,
                    symbols: &mut symbols,
                    imports: &mut imports,
                    deps: &mut deps,
                    scopes: vec![ScopeId::ROOT],
                    diag,
                };
                for node in &ast.members {
                    collector.node(node);
                }
                Ok(())
            }
            None => Err(CompileError::internal("stage 1 ran before parse")),
        };

        env.namespace_mut(ns).symbols = symbols;
        env.namespace_mut(ns).imports = imports;
        env.deps = deps;
        result
    }
}

struct Collector<'a, 'e> {
    env: &'e Environment,
    unit: UnitId,
    symbols: &'a mut SymbolTable,
    imports: &'a mut ImportTable,
    deps: &'a mut DependencyGraph,
    scopes: Vec<ScopeId>,
    diag: &'a mut Diagnostics,
}

impl Collector<'_, '_> {
    fn current_scope(&self) -> ScopeId {
        *self.scopes.last().expect("scope stack is never empty")
    }

    fn node(&mut self, node: &AstNode) {
        match node {
            AstNode::Stmt(stmt) => self.statement(stmt),
            AstNode::Expr(expr) => self.expression(expr),
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Let {
                symbol,
                modifiers,
                value,
                meta,
            } => {
                let kind = if value.is_lambda() {
                    BindingKind::Function
                } else {
                    BindingKind::Field
                };
                let binding = Binding::new(
                    &symbol.name,
                    meta.pos,
                    meta.span,
                    *modifiers,
                    kind,
                    meta.ty(),
                )
                .with_unit(self.unit);
                binding.mark_initialized();
                if let Err(existing) = self.symbols.insert(self.current_scope(), binding) {
                    let mut report = self.diag.report(
                        self.unit,
                        meta.span,
                        ResolutionError::DuplicateSymbol {
                            name: symbol.name.clone(),
                            existing: existing.pos,
                            new: meta.pos,
                        },
                    );
                    if let Some(unit) = existing.unit {
                        report = report.related_to(unit, existing.span, "first declared here");
                    }
                    report.emit();
                }
                self.expression(value);
            }
            Statement::Assign { value, .. } => self.expression(value),
            Statement::Import { path, alias, meta } => {
                match self.env.resolve_path(self.unit.namespace, path) {
                    Some(target) => {
                        self.imports.insert(Import {
                            path: path.clone(),
                            alias: alias.clone(),
                            target,
                            pos: meta.pos,
                            span: meta.span,
                            unit: self.unit,
                        });
                        self.deps.add_edge(
                            self.unit.namespace,
                            target,
                            EdgeInfo {
                                unit: self.unit,
                                span: meta.span,
                            },
                        );
                    }
                    None => {
                        self.diag
                            .report(
                                self.unit,
                                meta.span,
                                ResolutionError::UnresolvedImport {
                                    path: path.clone(),
                                    pos: meta.pos,
                                },
                            )
                            .emit();
                    }
                }
            }
        }
    }

    fn expression(&mut self, expr: &Expression) {
        match expr {
            Expression::BExpr { members, meta } => {
                let scope = self.symbols.allocate_scope();
                meta.record_scope(scope);
                self.scopes.push(scope);
                for member in members {
                    self.node(member);
                }
                self.scopes.pop();
            }
            Expression::LExpr {
                parameters,
                body,
                meta,
                ..
            } => {
                let scope = self.symbols.allocate_scope();
                meta.record_scope(scope);
                self.scopes.push(scope);
                for param in parameters {
                    let binding = Binding::new(
                        &param.symbol.name,
                        param.pos,
                        param.span,
                        param.modifiers,
                        BindingKind::Parameter,
                        param.ty.clone(),
                    )
                    .with_unit(self.unit);
                    binding.mark_initialized();
                    if let Err(existing) = self.symbols.insert(scope, binding) {
                        self.diag
                            .report(
                                self.unit,
                                param.span,
                                ResolutionError::DuplicateSymbol {
                                    name: param.symbol.name.clone(),
                                    existing: existing.pos,
                                    new: param.pos,
                                },
                            )
                            .emit();
                    }
                }
                self.expression(body);
                self.scopes.pop();
            }
            Expression::SExpr {
                callee, operands, ..
            } => {
                self.expression(callee);
                for operand in operands {
                    self.expression(operand);
                }
            }
            Expression::OExpr { operands, .. } => {
                for operand in operands {
                    self.expression(operand);
                }
            }
            Expression::PExpr {
                predicate, form, ..
            } => {
                self.expression(predicate);
                if let Some(then) = &form.then {
                    self.expression(then);
                }
                if let Some(otherwise) = &form.otherwise {
                    self.expression(otherwise);
                }
            }
            Expression::MExpr { accessors, .. } => {
                for accessor in accessors {
                    if let crate::ast::Access::FunctionCall(_, args) = accessor {
                        for arg in args {
                            self.expression(&arg.expression);
                        }
                    }
                }
            }
            Expression::VExpr { .. }
            | Expression::MatchExpr { .. }
            | Expression::IterExpr { .. } => {}
        }
    }
}
