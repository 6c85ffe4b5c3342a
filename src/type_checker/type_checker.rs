use log::debug;

use crate::{
    ast::{
        ast::{
            Declarations, Function, Parameter, Parameters, Program, ReturnValue, VariableDecl,
        },
        expressions::{
            ActualParameter, Arithmetic, ArrayAccess, Expr, FunctionCall, Ident, Logic,
            Parenthesis, Relational, Unary, Value,
        },
        lookups::BASIC_TYPE_LOOKUP,
        statements::{
            AssignStmt, IfStmt, LeftExpr, ProcCall, ReadStmt, ReturnStmt, Statements, WhileStmt,
            WriteExpr, WriteString,
        },
        types::{ArrayTypeSpec, BasicTypeSpec, TypeSpec},
    },
    dispatch::dispatch::{dispatch, Node, VisitResult, Visitor},
    errors::errors::{Diagnostic, DiagnosticKind, InternalError},
    Config, Position,
};

use super::{
    decorations::{CheckedProgram, Decorations},
    expr::{
        type_check_arithmetic, type_check_array_access, type_check_expr_ident,
        type_check_function_call, type_check_ident, type_check_logic, type_check_paramexp,
        type_check_parenthesis, type_check_relational, type_check_unary, type_check_value,
    },
    stmt::{
        type_check_assign_stmt, type_check_if_stmt, type_check_left_expr,
        type_check_proc_call, type_check_read_stmt, type_check_return_stmt,
        type_check_while_stmt, type_check_write_expr,
    },
    symbol_table::{ScopeError, Symbol, SymbolKind, SymbolTable},
    types::{Type, MAX_FRAME_SIZE},
};

/// The function whose body is being checked.
#[derive(Debug, Clone)]
pub struct FunctionContext {
    pub name: String,
    pub return_type: Type,
}

/// State of one run of the semantic checker.
///
/// Holds the scope stack, the decorations gathered so far and every
/// diagnostic reported. One instance checks exactly one program.
#[derive(Debug)]
pub struct TypeChecker<'c> {
    pub config: &'c Config,
    pub symbols: SymbolTable,
    pub decorations: Decorations,
    pub diagnostics: Vec<Diagnostic>,
    pub current_function: Option<FunctionContext>,
}

impl<'c> TypeChecker<'c> {
    pub fn new(config: &'c Config) -> Self {
        TypeChecker {
            config,
            symbols: SymbolTable::new(),
            decorations: Decorations::new(),
            diagnostics: vec![],
            current_function: None,
        }
    }

    pub fn report(&mut self, kind: DiagnosticKind, position: &Position) {
        debug!("diagnostic at {}: {}", position, kind);
        self.diagnostics.push(Diagnostic::new(kind, position.clone()));
    }

    /// Records the type of a node and hands it back.
    pub fn decorate(&mut self, node: Node<'_>, node_type: Type) -> Type {
        self.decorations.set_type(node.id(), node_type.clone());
        node_type
    }

    /// Type of a node the checker decorated earlier in this run.
    pub fn decorated_type(&self, node: Node<'_>) -> VisitResult<Type> {
        self.decorations
            .get_type(node.id())
            .cloned()
            .ok_or(InternalError::MissingDecoration {
                kind: node.kind(),
                id: node.id().0,
            })
    }

    /// Checks an expression whose value is used.
    ///
    /// A call to a procedure has no value; using one is reported here and
    /// typed `Error` so the consumer stays silent.
    pub fn check_value(&mut self, expr: &Expr) -> VisitResult<Type> {
        type_check_value(self, expr)
    }

    /// Declares a parameter or variable in the innermost scope, reporting
    /// clashes instead of failing.
    fn declare(&mut self, ident: &Ident, symbol: Symbol) -> VisitResult<()> {
        if self.config.warn_shadowing && symbol.kind != SymbolKind::Function {
            let shadows_function = self
                .symbols
                .lookup(&ident.name)
                .map(|existing| existing.is_function())
                .unwrap_or(false);
            if shadows_function {
                self.report(
                    DiagnosticKind::ShadowedDeclaration {
                        name: ident.name.clone(),
                    },
                    &ident.span.start,
                );
            }
        }

        let kind = symbol.kind;
        match self.symbols.declare(&ident.name, symbol).map(|_| ()) {
            Ok(()) => Ok(()),
            Err(ScopeError::DuplicateDeclaration { name }) => {
                self.report(DiagnosticKind::DuplicateDeclaration { name }, &ident.span.start);
                Ok(())
            }
            Err(ScopeError::FrameTooLarge { name }) => {
                self.report(DiagnosticKind::FrameTooLarge { name }, &ident.span.start);
                // Keep the name visible, without storage, so its uses stay silent.
                let placeholder = Symbol {
                    kind,
                    ..Symbol::variable(&ident.name, Type::Error)
                };
                self.symbols.declare(&ident.name, placeholder)?;
                Ok(())
            }
            Err(error) => Err(InternalError::Scope(error)),
        }
    }

    /// Computes and registers the signature of a function before any body
    /// is checked, so calls can refer to functions declared later.
    fn declare_function(&mut self, function: &Function) -> VisitResult<()> {
        let mut parameters = vec![];
        for parameter in function.parameters.iter() {
            let parameter_type = dispatch(self, &parameter.parameter_type)?;
            self.decorate(Node::Parameter(parameter), parameter_type.clone());
            parameters.push(parameter_type);
        }

        let return_type = match &function.return_value {
            Some(return_value) => dispatch(self, Node::ReturnValue(return_value))?,
            None => Type::Void,
        };

        let signature = Type::Function {
            parameters,
            return_type: Box::new(return_type),
        };
        self.decorate(Node::Function(function), signature.clone());
        self.decorate(Node::Ident(&function.name), signature.clone());

        self.declare(&function.name, Symbol::function(&function.name.name, signature))
    }

    fn check_entry_point(&mut self, program: &Program) {
        let entry_point = self.config.entry_point.clone();
        let properly_declared = match self.symbols.lookup_current(&entry_point) {
            Some(symbol) if symbol.is_function() => symbol
                .symbol_type
                .signature()
                .map(|(parameters, return_type)| parameters.is_empty() && return_type.is_void())
                .unwrap_or(false),
            _ => false,
        };

        if !properly_declared {
            self.report(
                DiagnosticKind::NoEntryPoint { name: entry_point },
                &program.span.start,
            );
        }
    }
}

impl Visitor for TypeChecker<'_> {
    type Output = Type;
    const PASS: &'static str = "type checking";

    fn visit_program(&mut self, node: &Program) -> VisitResult<Type> {
        let scope = self.symbols.open_scope();
        self.decorations.set_scope(node.id, scope);

        for function in node.functions.iter() {
            self.declare_function(function)?;
        }
        for function in node.functions.iter() {
            dispatch(self, Node::Function(function))?;
        }

        self.check_entry_point(node);
        self.symbols.close_scope();
        Ok(Type::Void)
    }

    fn visit_function(&mut self, node: &Function) -> VisitResult<Type> {
        debug!("checking function {}", node.name.name);
        let signature = self.decorated_type(Node::Function(node))?;
        let return_type = signature
            .signature()
            .map(|(_, return_type)| return_type.clone())
            .unwrap_or(Type::Error);

        let scope = self.symbols.open_scope();
        self.decorations.set_scope(node.id, scope);
        self.current_function = Some(FunctionContext {
            name: node.name.name.clone(),
            return_type,
        });

        dispatch(self, Node::Parameters(&node.parameters))?;
        dispatch(self, Node::Declarations(&node.declarations))?;
        dispatch(self, Node::Statements(&node.body))?;

        self.current_function = None;
        self.symbols.close_scope();
        Ok(Type::Void)
    }

    fn visit_parameters(&mut self, node: &Parameters) -> VisitResult<Type> {
        for parameter in node.iter() {
            dispatch(self, Node::Parameter(parameter))?;
        }
        Ok(Type::Void)
    }

    fn visit_parameter(&mut self, node: &Parameter) -> VisitResult<Type> {
        let parameter_type = self.decorated_type(Node::Parameter(node))?;
        self.declare(
            &node.name,
            Symbol::parameter(&node.name.name, parameter_type.clone()),
        )?;
        self.decorations.set_lvalue(node.name.id, true);
        Ok(self.decorate(Node::Ident(&node.name), parameter_type))
    }

    fn visit_return_value(&mut self, node: &ReturnValue) -> VisitResult<Type> {
        let return_type = dispatch(self, Node::BasicType(&node.return_type))?;
        Ok(self.decorate(Node::ReturnValue(node), return_type))
    }

    fn visit_declarations(&mut self, node: &Declarations) -> VisitResult<Type> {
        for declaration in node.iter() {
            dispatch(self, Node::VariableDecl(declaration))?;
        }
        Ok(Type::Void)
    }

    fn visit_variable_decl(&mut self, node: &VariableDecl) -> VisitResult<Type> {
        let variable_type = dispatch(self, &node.variable_type)?;
        for name in node.names.iter() {
            self.declare(name, Symbol::variable(&name.name, variable_type.clone()))?;
            self.decorations.set_lvalue(name.id, true);
            self.decorate(Node::Ident(name), variable_type.clone());
        }
        Ok(Type::Void)
    }

    fn visit_type(&mut self, node: &TypeSpec) -> VisitResult<Type> {
        match node {
            TypeSpec::Basic(basic) => dispatch(self, Node::BasicType(basic)),
            TypeSpec::Array(array) => dispatch(self, Node::ArrayType(array)),
        }
    }

    fn visit_array_type(&mut self, node: &ArrayTypeSpec) -> VisitResult<Type> {
        let element = dispatch(self, Node::BasicType(&node.element))?;

        // The whole array must fit in a frame; with an unknown element type
        // only the written size can be checked.
        let size = node.size.trim().parse::<u32>().ok().filter(|size| {
            element.as_basic().map_or(true, |basic| {
                size.checked_mul(basic.size())
                    .is_some_and(|bytes| bytes <= MAX_FRAME_SIZE)
            })
        });

        let array_type = match size {
            None => {
                self.report(
                    DiagnosticKind::InvalidArraySize {
                        size: node.size.clone(),
                    },
                    &node.span.start,
                );
                Type::Error
            }
            Some(size) => match element.as_basic() {
                Some(element) => Type::Array { element, size },
                None => Type::Error,
            },
        };

        Ok(self.decorate(Node::ArrayType(node), array_type))
    }

    fn visit_basic_type(&mut self, node: &BasicTypeSpec) -> VisitResult<Type> {
        let basic_type = match BASIC_TYPE_LOOKUP.get(node.name.as_str()) {
            Some(basic) => Type::Basic(*basic),
            None => {
                self.report(
                    DiagnosticKind::UnknownType {
                        name: node.name.clone(),
                    },
                    &node.span.start,
                );
                Type::Error
            }
        };
        Ok(self.decorate(Node::BasicType(node), basic_type))
    }

    fn visit_statements(&mut self, node: &Statements) -> VisitResult<Type> {
        for statement in node.iter() {
            dispatch(self, statement)?;
        }
        Ok(Type::Void)
    }

    fn visit_assign_stmt(&mut self, node: &AssignStmt) -> VisitResult<Type> {
        type_check_assign_stmt(self, node)
    }

    fn visit_if_stmt(&mut self, node: &IfStmt) -> VisitResult<Type> {
        type_check_if_stmt(self, node)
    }

    fn visit_while_stmt(&mut self, node: &WhileStmt) -> VisitResult<Type> {
        type_check_while_stmt(self, node)
    }

    fn visit_proc_call(&mut self, node: &ProcCall) -> VisitResult<Type> {
        type_check_proc_call(self, node)
    }

    fn visit_return_stmt(&mut self, node: &ReturnStmt) -> VisitResult<Type> {
        type_check_return_stmt(self, node)
    }

    fn visit_read_stmt(&mut self, node: &ReadStmt) -> VisitResult<Type> {
        type_check_read_stmt(self, node)
    }

    fn visit_write_expr(&mut self, node: &WriteExpr) -> VisitResult<Type> {
        type_check_write_expr(self, node)
    }

    fn visit_write_string(&mut self, _node: &WriteString) -> VisitResult<Type> {
        Ok(Type::Void)
    }

    fn visit_left_expr(&mut self, node: &LeftExpr) -> VisitResult<Type> {
        type_check_left_expr(self, node)
    }

    fn visit_function_call(&mut self, node: &FunctionCall) -> VisitResult<Type> {
        type_check_function_call(self, node)
    }

    fn visit_expr_ident(&mut self, node: &Ident) -> VisitResult<Type> {
        type_check_expr_ident(self, node)
    }

    fn visit_arithmetic(&mut self, node: &Arithmetic) -> VisitResult<Type> {
        type_check_arithmetic(self, node)
    }

    fn visit_relational(&mut self, node: &Relational) -> VisitResult<Type> {
        type_check_relational(self, node)
    }

    fn visit_array_access(&mut self, node: &ArrayAccess) -> VisitResult<Type> {
        type_check_array_access(self, node)
    }

    fn visit_unary(&mut self, node: &Unary) -> VisitResult<Type> {
        type_check_unary(self, node)
    }

    fn visit_logic(&mut self, node: &Logic) -> VisitResult<Type> {
        type_check_logic(self, node)
    }

    fn visit_parenthesis(&mut self, node: &Parenthesis) -> VisitResult<Type> {
        type_check_parenthesis(self, node)
    }

    fn visit_value(&mut self, node: &Value) -> VisitResult<Type> {
        Ok(self.decorate(Node::Value(node), Type::from(&node.literal)))
    }

    fn visit_paramexp(&mut self, node: &ActualParameter) -> VisitResult<Type> {
        type_check_paramexp(self, node)
    }

    fn visit_ident(&mut self, node: &Ident) -> VisitResult<Type> {
        type_check_ident(self, node)
    }
}

/// Checks a whole program.
///
/// Every static error is reported in the returned diagnostics; the checker
/// keeps going after each one. Only a defect in the checker itself makes
/// this fail.
pub fn type_check(program: &Program, config: &Config) -> Result<CheckedProgram, InternalError> {
    debug!("type checking {} functions", program.functions.len());
    let mut type_checker = TypeChecker::new(config);

    dispatch(&mut type_checker, Node::Program(program))?;

    debug_assert_eq!(type_checker.symbols.depth(), 0);
    debug!(
        "type checking finished with {} diagnostics",
        type_checker.diagnostics.len()
    );

    Ok(CheckedProgram {
        decorations: type_checker.decorations,
        symbols: type_checker.symbols,
        diagnostics: type_checker.diagnostics,
    })
}
