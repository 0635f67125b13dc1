use std::{collections::HashSet, fmt};

use crate::ast::{Expr, FunDecl, Program, Stmt};

/// Index of a scope in a [`ScopeTable`]. Scope `#0` is the program root.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const GLOBAL: Self = Self(0);

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The body of one function declaration, or the program root.
#[derive(Clone, Debug)]
pub struct Scope {
    pub name: Box<str>,
    pub parent: Option<ScopeId>,
    pub depth: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Variable,
    Function,
    Parameter,
    /// Declared by the host before the program ran.
    Host,
}

#[derive(Clone, Debug)]
pub struct Declaration {
    pub name: Box<str>,
    pub kind: DeclKind,
    pub scope: ScopeId,
    pub depth: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Declared in an enclosing function body, `hops` scopes out from the reference.
    Local { scope: ScopeId, hops: usize },
    Global,
    Unbound,
}

/// One identifier use: a variable read, an assignment target or a callee.
#[derive(Clone, Debug)]
pub struct Reference {
    pub name: Box<str>,
    pub scope: ScopeId,
    pub resolution: Resolution,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "`{}` in scope {} ", self.name, self.scope)?;
        match self.resolution {
            Resolution::Local { scope, hops } => {
                write!(f, "resolves to scope {} ({} hop(s))", scope, hops)
            }
            Resolution::Global => write!(f, "resolves to a global"),
            Resolution::Unbound => write!(f, "is never declared where it is visible"),
        }
    }
}

/// Static view of a program's scopes, built once before it runs.
///
/// A function body sees the enclosing body's declarations made *before* the function was
/// declared (plus its own name). Inside functions any global name resolves, wherever it is
/// declared; which binding is read when a global is declared twice is left to the runtime.
///
/// Declarations inside `if` branches belong to the enclosing body and count whether or not the
/// branch runs, so a `Local` here can still be unbound at runtime.
///
/// ### Example
///
/// ```
/// use lexenv::{ast::*, Resolution, ScopeTable};
///
/// let table = ScopeTable::build(&Program::new(vec![
///     fun("outer", &["x"], vec![
///         fun("inner", &[], vec![ret(ident("x"))]),
///     ]),
/// ]));
///
/// let x = table.references().iter().find(|r| &*r.name == "x").unwrap();
/// assert!(matches!(x.resolution, Resolution::Local { hops: 1, .. }));
/// ```
#[derive(Clone, Debug)]
pub struct ScopeTable {
    scopes: Vec<Scope>,
    declarations: Vec<Declaration>,
    references: Vec<Reference>,
}

impl ScopeTable {
    pub fn build(program: &Program) -> Self {
        Self::with_host_globals(program, Vec::<&str>::new())
    }

    /// Build the table, treating `host` names as globals that exist before the program runs.
    pub fn with_host_globals<I, S>(program: &Program, host: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Builder {
            table: Self {
                scopes: vec![Scope {
                    name: "<global>".into(),
                    parent: None,
                    depth: 0,
                }],
                declarations: Vec::new(),
                references: Vec::new(),
            },
            all_globals: HashSet::new(),
            seen_globals: HashSet::new(),
            current: None,
        };

        for name in host {
            builder.declare_host(name.as_ref());
        }
        builder.all_globals = builder.seen_globals.clone();
        builder.collect_globals(program.items());

        builder.walk_block(program.items());
        builder.table
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn scope(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0)
    }

    /// The first scope, in declaration order, belonging to a function called `name`.
    pub fn scope_named(&self, name: &str) -> Option<ScopeId> {
        self.scopes
            .iter()
            .position(|s| &*s.name == name)
            .map(ScopeId)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn declarations_in(&self, scope: ScopeId) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.scope == scope)
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn unbound(&self) -> impl Iterator<Item = &Reference> {
        self.references
            .iter()
            .filter(|r| r.resolution == Resolution::Unbound)
    }
}

impl fmt::Display for ScopeTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (index, scope) in self.scopes.iter().enumerate() {
            let id = ScopeId(index);
            write!(f, "== {} {} (depth {})", id, scope.name, scope.depth)?;
            if let Some(parent) = scope.parent {
                write!(f, " in {}", parent)?;
            }
            writeln!(f)?;

            for decl in self.declarations_in(id) {
                writeln!(f, "{:>10} {}", format!("{:?}", decl.kind), decl.name)?;
            }
        }

        for reference in &self.references {
            writeln!(f, "{}", reference)?;
        }

        Ok(())
    }
}

/// One function body being walked.
struct Frame<'p> {
    enclosing: Option<Box<Self>>,
    id: ScopeId,
    locals: Vec<&'p str>,
    /// How many of the enclosing body's locals this body can see.
    horizon: usize,
}

impl<'p> Frame<'p> {
    fn resolve(&self, query: &str) -> Option<(ScopeId, usize)> {
        self.resolve_within(query, self.locals.len(), 0)
    }

    fn resolve_within(&self, query: &str, limit: usize, hops: usize) -> Option<(ScopeId, usize)> {
        if self.locals[..limit].iter().rev().any(|name| *name == query) {
            return Some((self.id, hops));
        }

        self.enclosing
            .as_ref()
            .and_then(|parent| parent.resolve_within(query, self.horizon, hops + 1))
    }
}

struct Builder<'p> {
    table: ScopeTable,
    all_globals: HashSet<Box<str>>,
    seen_globals: HashSet<Box<str>>,
    current: Option<Box<Frame<'p>>>,
}

impl<'p> Builder<'p> {
    fn current_scope(&self) -> ScopeId {
        self.current.as_ref().map_or(ScopeId::GLOBAL, |f| f.id)
    }

    fn collect_globals(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Var { name, .. } => {
                    self.all_globals.insert(name.clone());
                }
                Stmt::Fun(decl) => {
                    self.all_globals.insert(decl.name.clone());
                }
                Stmt::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    self.collect_globals(then_branch);
                    self.collect_globals(else_branch);
                }
                _ => (),
            }
        }
    }

    fn declare_host(&mut self, name: &str) {
        self.seen_globals.insert(name.into());
        self.table.declarations.push(Declaration {
            name: name.into(),
            kind: DeclKind::Host,
            scope: ScopeId::GLOBAL,
            depth: 0,
        });
    }

    fn declare(&mut self, name: &'p str, kind: DeclKind) {
        let scope = self.current_scope();

        if let Some(frame) = &mut self.current {
            frame.locals.push(name);
        } else {
            self.seen_globals.insert(name.into());
        }

        self.table.declarations.push(Declaration {
            name: name.into(),
            kind,
            scope,
            depth: self.table.scopes[scope.0].depth,
        });
    }

    fn reference(&mut self, name: &str) {
        let resolution = match &self.current {
            Some(frame) => match frame.resolve(name) {
                Some((scope, hops)) => Resolution::Local { scope, hops },
                None if self.all_globals.contains(name) => Resolution::Global,
                None => Resolution::Unbound,
            },
            // top-level code runs in order, so only globals declared so far are visible
            None if self.seen_globals.contains(name) => Resolution::Global,
            None => Resolution::Unbound,
        };

        self.table.references.push(Reference {
            name: name.into(),
            scope: self.current_scope(),
            resolution,
        });
    }

    fn walk_block(&mut self, stmts: &'p [Stmt]) {
        for stmt in stmts {
            self.walk_stmt(stmt);
        }
    }

    fn walk_stmt(&mut self, stmt: &'p Stmt) {
        match stmt {
            Stmt::Var { name, init } => {
                self.walk_expr(init);
                self.declare(name, DeclKind::Variable);
            }
            Stmt::Fun(decl) => {
                self.declare(&decl.name, DeclKind::Function);
                self.walk_function(decl);
            }
            Stmt::Assign { name, value } => {
                self.walk_expr(value);
                self.reference(name);
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.walk_expr(cond);
                self.walk_block(then_branch);
                self.walk_block(else_branch);
            }
            Stmt::Return(value) | Stmt::Expr(value) => self.walk_expr(value),
        }
    }

    fn walk_function(&mut self, decl: &'p FunDecl) {
        let parent = self.current_scope();
        let id = ScopeId(self.table.scopes.len());
        self.table.scopes.push(Scope {
            name: decl.name.clone(),
            parent: Some(parent),
            depth: self.table.scopes[parent.0].depth + 1,
        });

        let enclosing = self.current.take();
        let horizon = enclosing.as_ref().map_or(0, |f| f.locals.len());
        self.current = Some(Box::new(Frame {
            enclosing,
            id,
            locals: Vec::new(),
            horizon,
        }));

        for param in &decl.params {
            self.declare(param, DeclKind::Parameter);
        }
        self.walk_block(&decl.body);

        if let Some(frame) = self.current.take() {
            self.current = frame.enclosing;
        }
    }

    fn walk_expr(&mut self, expr: &'p Expr) {
        match expr {
            Expr::Nil | Expr::Boolean(_) | Expr::Int(_) => (),
            Expr::Ident(name) => self.reference(name),
            Expr::Call { callee, args } => {
                self.reference(callee);
                for arg in args {
                    self.walk_expr(arg);
                }
            }
            Expr::Unary { rhs, .. } => self.walk_expr(rhs),
            Expr::Binary { lhs, rhs, .. } | Expr::Logical { lhs, rhs, .. } => {
                self.walk_expr(lhs);
                self.walk_expr(rhs);
            }
        }
    }
}
