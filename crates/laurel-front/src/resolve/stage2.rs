//! Resolver stage 2: type resolution and use-site verification.
//!
//! Runs over namespaces in dependency order. Every identifier use is
//! looked up through the sub-environment, promoted in place on success,
//! and reported with suggestions on a miss. Types flow bottom-up into the
//! metadata cells; stage 2 introduces no new symbols and no new scopes,
//! only re-entering the scopes stage 1 recorded.

use laurel_core::{LangType, Primitive, Span};

use crate::ast::{
    Access, AstNode, Expression, MetaData, Operation, Statement, Symbol, SymbolLoc, Value,
};
use crate::diagnostics::Diagnostics;
use crate::env::{BindingKind, Environment, Found, NamespaceId, Origin, ScopeId, SubEnv};
use crate::error::{AccessViolationKind, CompileError, ResolutionError, Result};
use crate::pipeline::UnitTransform;
use crate::unit::{UnitId, UnitState};

use super::compat::{self, Compat};

const MAX_SUGGESTIONS: usize = 3;
const MAX_SUGGESTION_DISTANCE: usize = 2;

pub struct ResolveStage2;

impl UnitTransform for ResolveStage2 {
    fn name(&self) -> &'static str {
        "resolve_stage_2"
    }

    fn from_state(&self) -> UnitState {
        UnitState::PartiallyResolved
    }

    fn to_state(&self) -> UnitState {
        UnitState::FullyResolved
    }

    /// Detects import cycles, applies the forward-declaration recovery,
    /// and returns a dependencies-first namespace order with each cycle's
    /// broken member processed after its peers.
    fn prepare(&self, env: &mut Environment, diag: &mut Diagnostics) -> Vec<NamespaceId> {
        let cycles = env.deps.detect_cycles();
        let mut order = env.deps.topo_order();

        for cycle in &cycles {
            let names: Vec<String> = cycle.iter().map(|&ns| env.path_of(ns)).collect();
            let back_edge = cycle
                .last()
                .and_then(|&last| env.deps.edge(last, cycle[0]))
                .copied();
            let (unit, span) = match back_edge {
                Some(info) => (info.unit, info.span),
                None => (
                    UnitId {
                        namespace: cycle[0],
                        index: 0,
                    },
                    Span::empty(0),
                ),
            };
            diag.report(unit, span, ResolutionError::CircularDependency { cycle: names })
                .emit();

            let Some(broken) = cycle
                .iter()
                .copied()
                .max_by_key(|&ns| env.deps.incoming_within(ns, cycle))
            else {
                continue;
            };
            for binding in env.namespace(broken).symbols.bindings_in(ScopeId::ROOT) {
                binding.mark_forward_declared();
            }

            // The broken member completes after the rest of its cycle.
            if let Some(from) = order.iter().position(|&ns| ns == broken) {
                let last_peer = cycle
                    .iter()
                    .filter(|&&ns| ns != broken)
                    .filter_map(|&ns| order.iter().position(|&x| x == ns))
                    .max();
                if let Some(last_peer) = last_peer
                    && from < last_peer
                {
                    order.remove(from);
                    order.insert(last_peer, broken);
                }
            }
        }

        order
    }

    fn apply(&self, env: &mut Environment, unit: UnitId, diag: &mut Diagnostics) -> Result<()> {
        let env: &Environment = env;
        let Some(ast) = env.unit(unit).ast.as_ref() else {
            return Err(CompileError::internal("stage 2 ran before parse"));
        };
        let mut resolver = UseResolver {
            sub: SubEnv::new(env, unit.namespace),
            unit,
            diag,
            lambda_floor: 0,
        };
        for node in &ast.members {
            resolver.node(node);
        }
        Ok(())
    }
}

struct UseResolver<'a, 'e> {
    sub: SubEnv<'e>,
    unit: UnitId,
    diag: &'a mut Diagnostics,
    /// Index into the scope chain where the innermost lambda begins.
    /// Reassignment targets must live at or above this index.
    lambda_floor: usize,
}

impl<'e> UseResolver<'_, 'e> {
    /// Statements yield no value; expressions yield their type.
    fn node(&mut self, node: &AstNode) -> Option<LangType> {
        match node {
            AstNode::Stmt(stmt) => {
                self.statement(stmt);
                None
            }
            AstNode::Expr(expr) => Some(self.expression(expr)),
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Let {
                symbol,
                value,
                meta,
                ..
            } => {
                let value_ty = self.expression(value);
                if let Some(found) = self.sub.lookup(&symbol.name) {
                    let declared = meta.ty();
                    if declared.is_undefined() {
                        meta.set_ty(value_ty.clone());
                        found.binding.set_ty(value_ty);
                    } else {
                        self.check_assignable(&declared, &value_ty, value);
                        if found.binding.ty().is_undefined() {
                            found.binding.set_ty(declared);
                        }
                    }
                    found.binding.mark_initialized();
                    found.binding.clear_forward_declared();
                } else {
                    // Stage 1 inserts every declaration; a miss here means
                    // the declaration itself was reported as a duplicate.
                    self.report_undefined(&symbol.name, meta);
                }
                meta.mark_resolved();
            }
            Statement::Assign {
                symbol,
                value,
                meta,
            } => {
                let value_ty = self.expression(value);
                match self.sub.lookup(&symbol.name) {
                    None => self.report_undefined(&symbol.name, meta),
                    Some(found) => {
                        symbol.resolve(found.loc);
                        if found.binding.kind == BindingKind::Parameter {
                            self.report_access(
                                &symbol.name,
                                meta,
                                AccessViolationKind::AssignToParameter,
                            );
                        } else if !found.binding.is_mutable() {
                            self.report_access(&symbol.name, meta, AccessViolationKind::NotMutable);
                        } else if !self.target_is_local(&found) {
                            self.diag
                                .report(
                                    self.unit,
                                    meta.span,
                                    ResolutionError::ScopeViolation {
                                        symbol: symbol.name.clone(),
                                        scope: format!(
                                            "{}/{}",
                                            self.sub.env().path_of(found.loc.namespace),
                                            found.loc.scope
                                        ),
                                        pos: meta.pos,
                                    },
                                )
                                .emit();
                        } else {
                            let target_ty = found.binding.ty();
                            if target_ty.is_undefined() {
                                found.binding.set_ty(value_ty);
                            } else {
                                self.check_assignable(&target_ty, &value_ty, value);
                            }
                            found.binding.mark_initialized();
                        }
                        meta.set_ty(found.binding.ty());
                    }
                }
                meta.mark_resolved();
            }
            Statement::Import { meta, .. } => {
                // Registered by stage 1; failures were reported there.
                meta.mark_resolved();
            }
        }
    }

    fn expression(&mut self, expr: &Expression) -> LangType {
        let ty = match expr {
            Expression::VExpr { value, meta } => self.value(value, meta),
            Expression::BExpr { members, meta } => self.block(members, meta),
            Expression::OExpr { op, operands, meta } => self.operator(*op, operands, meta),
            Expression::SExpr {
                callee,
                operands,
                meta,
            } => self.application(callee, operands, meta),
            Expression::MExpr { accessors, meta } => self.member(accessors, meta),
            Expression::LExpr {
                parameters,
                body,
                meta,
                ..
            } => self.lambda(parameters, body, meta),
            Expression::PExpr {
                predicate, form, ..
            } => {
                let ty = self.conditional(predicate, form);
                form.meta.set_ty(ty.clone());
                form.meta.mark_resolved();
                ty
            }
            Expression::MatchExpr { .. } | Expression::IterExpr { .. } => LangType::Undefined,
        };
        expr.meta().set_ty(ty.clone());
        expr.meta().mark_resolved();
        ty
    }

    fn value(&mut self, value: &Value, meta: &MetaData) -> LangType {
        match value {
            Value::Bool(_) => LangType::Primitive(Primitive::Bool),
            Value::I64(_) => LangType::Primitive(Primitive::I64),
            Value::F64(_) => LangType::Primitive(Primitive::F64),
            Value::Nil => LangType::Primitive(Primitive::Nil),
            Value::Identifier(symbol) => match self.sub.lookup(&symbol.name) {
                Some(found) => self.bind_use(symbol, &found, meta),
                None => {
                    self.report_undefined(&symbol.name, meta);
                    LangType::Undefined
                }
            },
        }
    }

    fn block(&mut self, members: &[AstNode], meta: &MetaData) -> LangType {
        let entered = match meta.scope() {
            Some(scope) => {
                self.sub.push_scope(scope);
                true
            }
            None => false,
        };
        let mut last = None;
        for member in members {
            last = self.node(member);
        }
        if entered {
            self.sub.pop_scope();
        }
        // A statement-only block has no value.
        last.unwrap_or(LangType::Primitive(Primitive::Nil))
    }

    fn operator(&mut self, op: Operation, operands: &[Expression], _meta: &MetaData) -> LangType {
        let tys: Vec<LangType> = operands.iter().map(|o| self.expression(o)).collect();

        if op.is_logic() {
            for (ty, operand) in tys.iter().zip(operands) {
                if !ty.is_undefined() && !ty.is_bool() {
                    self.report_mismatch(
                        LangType::Primitive(Primitive::Bool),
                        ty.clone(),
                        operand.meta(),
                    );
                }
            }
            return LangType::Primitive(Primitive::Bool);
        }

        if op.is_comparison() {
            self.fold_numeric(&tys, operands);
            return LangType::Primitive(Primitive::Bool);
        }

        self.fold_numeric(&tys, operands)
    }

    /// Folds operand types pairwise per the numeric rules, reporting the
    /// first non-numeric operand.
    fn fold_numeric(&mut self, tys: &[LangType], operands: &[Expression]) -> LangType {
        let mut acc: Option<Primitive> = None;
        for (ty, operand) in tys.iter().zip(operands) {
            let prim = match ty {
                LangType::Undefined => continue,
                LangType::Primitive(p) if p.is_numeric() => *p,
                other => {
                    self.report_mismatch(
                        LangType::Primitive(acc.unwrap_or(Primitive::I64)),
                        other.clone(),
                        operand.meta(),
                    );
                    continue;
                }
            };
            acc = Some(match acc {
                None => prim,
                Some(prev) => compat::merge_numeric(prev, prim).unwrap_or(prim),
            });
        }
        acc.map(LangType::Primitive).unwrap_or(LangType::Undefined)
    }

    fn application(
        &mut self,
        callee: &Expression,
        operands: &[Expression],
        meta: &MetaData,
    ) -> LangType {
        let callee_ty = self.expression(callee);
        let operand_tys: Vec<LangType> = operands.iter().map(|o| self.expression(o)).collect();
        match callee_ty {
            LangType::Function { params, ret } => {
                if params.len() != operand_tys.len() {
                    let expected = LangType::Function {
                        params,
                        ret: ret.clone(),
                    };
                    self.report_mismatch(
                        expected,
                        LangType::function(operand_tys, LangType::Undefined),
                        meta,
                    );
                    return *ret;
                }
                for (param, (ty, operand)) in params.iter().zip(operand_tys.iter().zip(operands)) {
                    self.check_assignable(param, ty, operand);
                }
                *ret
            }
            LangType::Undefined => LangType::Undefined,
            other => {
                self.report_mismatch(
                    LangType::function(operand_tys, LangType::Undefined),
                    other,
                    callee.meta(),
                );
                LangType::Undefined
            }
        }
    }

    fn lambda(
        &mut self,
        parameters: &[crate::ast::Parameter],
        body: &Expression,
        meta: &MetaData,
    ) -> LangType {
        // The type clause on a lambda declares its return type.
        let declared_ret = meta.ty();

        let entered = match meta.scope() {
            Some(scope) => {
                self.sub.push_scope(scope);
                true
            }
            None => false,
        };
        let saved_floor = self.lambda_floor;
        self.lambda_floor = self.sub.depth().saturating_sub(1);

        let body_ty = self.expression(body);

        self.lambda_floor = saved_floor;
        if entered {
            self.sub.pop_scope();
        }

        let ret = if declared_ret.is_undefined() {
            body_ty
        } else {
            self.check_assignable(&declared_ret, &body_ty, body);
            declared_ret
        };
        let params = parameters.iter().map(|p| p.ty.clone()).collect();
        LangType::function(params, ret)
    }

    fn conditional(
        &mut self,
        predicate: &Expression,
        form: &crate::ast::PredicateForm,
    ) -> LangType {
        let pred_ty = self.expression(predicate);
        if !pred_ty.is_undefined() && !pred_ty.is_bool() {
            self.report_mismatch(
                LangType::Primitive(Primitive::Bool),
                pred_ty,
                predicate.meta(),
            );
        }

        let then_ty = form.then.as_deref().map(|e| self.expression(e));
        let else_ty = form.otherwise.as_deref().map(|e| self.expression(e));

        match (then_ty, else_ty) {
            (Some(t), Some(e)) => self.merge_arms(t, e, form),
            (Some(t), None) => t,
            (None, Some(e)) => e,
            (None, None) => LangType::Undefined,
        }
    }

    fn merge_arms(
        &mut self,
        then_ty: LangType,
        else_ty: LangType,
        form: &crate::ast::PredicateForm,
    ) -> LangType {
        if then_ty.is_undefined() {
            return else_ty;
        }
        if else_ty.is_undefined() || then_ty == else_ty {
            return then_ty;
        }
        if let (LangType::Primitive(a), LangType::Primitive(b)) = (&then_ty, &else_ty)
            && let Some(merged) = compat::merge_numeric(*a, *b)
        {
            return LangType::Primitive(merged);
        }
        self.report_mismatch(then_ty.clone(), else_ty, &form.meta);
        then_ty
    }

    fn member(&mut self, accessors: &[Access], meta: &MetaData) -> LangType {
        let mut idx = 0;
        let mut ctx: Option<NamespaceId> = None;

        while let Some(Access::Namespace(symbol)) = accessors.get(idx) {
            let resolved = match ctx {
                None => self.sub.resolve_namespace(&symbol.name),
                Some(ns) => self.sub.env().namespace(ns).child(&symbol.name),
            };
            match resolved {
                Some(ns) => {
                    symbol.resolve(SymbolLoc {
                        namespace: ns,
                        scope: ScopeId::ROOT,
                    });
                    ctx = Some(ns);
                }
                None => {
                    self.diag
                        .report(
                            self.unit,
                            meta.span,
                            ResolutionError::UnresolvedImport {
                                path: symbol.name.clone(),
                                pos: meta.pos,
                            },
                        )
                        .emit();
                    return LangType::Undefined;
                }
            }
            idx += 1;
        }

        let mut current = LangType::Undefined;
        let mut at_base = true;
        while idx < accessors.len() {
            match &accessors[idx] {
                Access::Namespace(_) => unreachable!("namespace hops are a prefix"),
                Access::Type(symbol) => {
                    symbol.resolve(SymbolLoc {
                        namespace: ctx.unwrap_or_else(|| self.sub.namespace()),
                        scope: ScopeId::ROOT,
                    });
                    current = LangType::Quote;
                }
                Access::Identifier(symbol) => {
                    if at_base {
                        current = self.lookup_use(symbol, ctx, meta);
                    } else {
                        // Field access needs class/struct types, which are
                        // not implemented; nothing can satisfy it.
                        self.report_undefined(&symbol.name, meta);
                        current = LangType::Undefined;
                    }
                }
                Access::FunctionCall(symbol, args) => {
                    let mut arg_info = Vec::with_capacity(args.len());
                    for arg in args {
                        let ty = self.expression(&arg.expression);
                        arg_info.push((ty, &arg.expression));
                    }
                    current = self.call(symbol, &arg_info, ctx, meta);
                }
                Access::FunctionAccess(symbol) => {
                    current = match self.find_use(symbol, ctx, meta) {
                        Some(found) => found.binding.ty(),
                        None => LangType::Undefined,
                    };
                }
            }
            at_base = false;
            idx += 1;
        }
        current
    }

    fn call(
        &mut self,
        symbol: &Symbol,
        args: &[(LangType, &Expression)],
        ctx: Option<NamespaceId>,
        meta: &MetaData,
    ) -> LangType {
        let Some(found) = self.find_use(symbol, ctx, meta) else {
            return LangType::Undefined;
        };
        match found.binding.ty() {
            LangType::Function { params, ret } => {
                if params.len() != args.len() {
                    let actual =
                        LangType::function(args.iter().map(|(t, _)| t.clone()).collect(), LangType::Undefined);
                    self.report_mismatch(LangType::Function { params, ret: ret.clone() }, actual, meta);
                    return *ret;
                }
                for (param, &(ref ty, expr)) in params.iter().zip(args) {
                    self.check_assignable(param, ty, expr);
                }
                *ret
            }
            LangType::Undefined => LangType::Undefined,
            other => {
                let wanted = LangType::function(
                    args.iter().map(|(t, _)| t.clone()).collect(),
                    LangType::Undefined,
                );
                self.report_mismatch(wanted, other, meta);
                LangType::Undefined
            }
        }
    }

    /// Looks up a use site in the member-access context and promotes the
    /// symbol on success, reporting a miss with suggestions.
    fn find_use(
        &mut self,
        symbol: &Symbol,
        ctx: Option<NamespaceId>,
        meta: &MetaData,
    ) -> Option<Found<'e>> {
        let found = match ctx {
            Some(ns) => self.sub.lookup_in_namespace(ns, &symbol.name),
            None => self.sub.lookup(&symbol.name),
        };
        match found {
            Some(found) => {
                self.check_visibility(&symbol.name, &found, meta);
                symbol.resolve(found.loc);
                Some(found)
            }
            None => {
                match ctx {
                    Some(ns) => self.report_undefined_in(&symbol.name, ns, meta),
                    None => self.report_undefined(&symbol.name, meta),
                }
                None
            }
        }
    }

    fn lookup_use(
        &mut self,
        symbol: &Symbol,
        ctx: Option<NamespaceId>,
        meta: &MetaData,
    ) -> LangType {
        match self.find_use(symbol, ctx, meta) {
            Some(found) => found.binding.ty(),
            None => LangType::Undefined,
        }
    }

    fn bind_use(&mut self, symbol: &Symbol, found: &Found<'_>, meta: &MetaData) -> LangType {
        self.check_visibility(&symbol.name, found, meta);
        symbol.resolve(found.loc);
        found.binding.ty()
    }

    /// Cross-namespace access through an import requires `@pub`. Parent
    /// namespaces stay visible to their children without it.
    fn check_visibility(&mut self, name: &str, found: &Found<'_>, meta: &MetaData) {
        if found.origin == Origin::Import && !found.binding.is_public() {
            self.report_access(name, meta, AccessViolationKind::NotPublic);
        }
    }

    fn target_is_local(&self, found: &Found<'_>) -> bool {
        if found.loc.namespace != self.sub.namespace() {
            return false;
        }
        match self
            .sub
            .chain()
            .iter()
            .position(|&scope| scope == found.loc.scope)
        {
            Some(index) => index >= self.lambda_floor,
            None => false,
        }
    }

    fn check_assignable(&mut self, expected: &LangType, actual: &LangType, value: &Expression) {
        match compat::check(expected, actual) {
            Compat::Equal => {}
            Compat::Widen(conversion) => value.meta().record_conversion(conversion),
            Compat::Incompatible => {
                if let Expression::VExpr {
                    value: literal,
                    meta,
                } = value
                    && let Some(conversion) = compat::literal_fit(expected, literal)
                {
                    meta.record_conversion(conversion);
                    meta.set_ty(expected.clone());
                    return;
                }
                self.report_mismatch(expected.clone(), actual.clone(), value.meta());
            }
        }
    }

    fn report_mismatch(&mut self, expected: LangType, actual: LangType, meta: &MetaData) {
        self.diag
            .report(
                self.unit,
                meta.span,
                ResolutionError::TypeMismatch {
                    expected,
                    actual,
                    pos: meta.pos,
                },
            )
            .emit();
    }

    fn report_undefined(&mut self, name: &str, meta: &MetaData) {
        let visible = self.sub.visible_names();
        let suggestions = laurel_core::similar_names(
            name,
            visible.iter().map(String::as_str),
            MAX_SUGGESTION_DISTANCE,
            MAX_SUGGESTIONS,
        )
        .into_iter()
        .map(str::to_owned)
        .collect();
        self.diag
            .report(
                self.unit,
                meta.span,
                ResolutionError::UndefinedSymbol {
                    name: name.to_owned(),
                    pos: meta.pos,
                    suggestions,
                },
            )
            .emit();
    }

    fn report_undefined_in(&mut self, name: &str, ns: NamespaceId, meta: &MetaData) {
        let table = &self.sub.env().namespace(ns).symbols;
        let suggestions = laurel_core::similar_names(
            name,
            table.names_in(ScopeId::ROOT),
            MAX_SUGGESTION_DISTANCE,
            MAX_SUGGESTIONS,
        )
        .into_iter()
        .map(str::to_owned)
        .collect();
        self.diag
            .report(
                self.unit,
                meta.span,
                ResolutionError::UndefinedSymbol {
                    name: name.to_owned(),
                    pos: meta.pos,
                    suggestions,
                },
            )
            .emit();
    }

    fn report_access(&mut self, name: &str, meta: &MetaData, kind: AccessViolationKind) {
        self.diag
            .report(
                self.unit,
                meta.span,
                ResolutionError::AccessibilityViolation {
                    symbol: name.to_owned(),
                    pos: meta.pos,
                    kind,
                },
            )
            .emit();
    }
}
