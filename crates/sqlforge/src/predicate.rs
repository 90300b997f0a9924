//! Composable boolean conditions for parameterized statements.
//!
//! A [`Predicate`] holds its values but not yet their parameter names. The
//! statement that receives it calls [`Predicate::initialize`] once, which
//! allocates `param0`, `param1`, … from the statement's [`ParameterContext`]
//! and binds the values; [`Predicate::render`] then produces the SQL text.
//!
//! ```ignore
//! let pred = Predicate::and(vec![
//!     Predicate::eq("dept", "Sales"),
//!     Predicate::in_list("grade", [3, 4]),
//! ]);
//! // after initialize: (dept = :param0 and grade in (:param1, :param2))
//! ```

use crate::builder::{SelectBuilder, SqlBuilder};
use crate::param::ParameterContext;
use crate::value::Value;

/// Rendered in place of a parameter name before initialization.
const UNALLOCATED: &str = "?";

/// An expression compared against a single bound value.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    expr: String,
    value: Value,
    param: Option<String>,
}

impl Comparison {
    fn new(expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            expr: expr.into(),
            value: value.into(),
            param: None,
        }
    }

    fn initialize(&mut self, ctx: &mut ParameterContext) {
        self.param = Some(ctx.allocate_value(self.value.clone()));
    }

    fn param(&self) -> &str {
        self.param.as_deref().unwrap_or(UNALLOCATED)
    }

    fn render(&self, op: &str) -> String {
        format!("{} {op} :{}", self.expr, self.param())
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// `exists (select 1 from <table> ...)`.
///
/// Literal conditions are rendered first, followed by nested predicates in the
/// order they were added. Nested predicates draw their parameter names from the
/// outer statement's context.
#[derive(Debug, Clone, PartialEq)]
pub struct Exists {
    select: SelectBuilder,
    predicates: Vec<Predicate>,
}

impl Exists {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            select: SelectBuilder::new().column("1").from(table),
            predicates: Vec::new(),
        }
    }

    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.select = self.select.join(join);
        self
    }

    /// Add a literal SQL condition, e.g. `sd.emp_id = e.id`.
    pub fn where_(mut self, expr: impl Into<String>) -> Self {
        self.select = self.select.where_(expr);
        self
    }

    pub fn and(self, expr: impl Into<String>) -> Self {
        self.where_(expr)
    }

    /// Add a nested predicate.
    pub fn where_pred(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicates.push(predicate.into());
        self
    }

    pub fn and_pred(self, predicate: impl Into<Predicate>) -> Self {
        self.where_pred(predicate)
    }

    fn initialize(&mut self, ctx: &mut ParameterContext) {
        for predicate in &mut self.predicates {
            predicate.initialize(ctx);
        }
    }

    fn render(&self) -> String {
        let mut select = self.select.clone();
        for predicate in &self.predicates {
            select.push_where(predicate.render());
        }
        format!("exists ({})", select.to_sql())
    }
}

impl From<Exists> for Predicate {
    fn from(exists: Exists) -> Self {
        Predicate::Exists(exists)
    }
}

/// A boolean SQL condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Eq(Comparison),
    Ne(Comparison),
    Gt(Comparison),
    Gte(Comparison),
    Lt(Comparison),
    Lte(Comparison),
    Like(Comparison),
    In {
        expr: String,
        values: Vec<Value>,
        params: Vec<String>,
    },
    IsNull(String),
    IsNotNull(String),
    Exists(Exists),
    Not(Box<Predicate>),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
    /// All bits of the mask are set: `(expr & :p) = :p`.
    BitmaskAll(Comparison),
    /// Any bit of the mask is set: `(expr & :p) <> 0`.
    BitmaskAny(Comparison),
    /// Raw SQL, rendered verbatim.
    Literal(String),
}

impl Predicate {
    pub fn eq(expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Eq(Comparison::new(expr, value))
    }

    pub fn ne(expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Ne(Comparison::new(expr, value))
    }

    pub fn gt(expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gt(Comparison::new(expr, value))
    }

    pub fn gte(expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Gte(Comparison::new(expr, value))
    }

    pub fn lt(expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Lt(Comparison::new(expr, value))
    }

    pub fn lte(expr: impl Into<String>, value: impl Into<Value>) -> Self {
        Predicate::Lte(Comparison::new(expr, value))
    }

    /// `expr like :p`; the pattern (with its `%` wildcards) is the bound value.
    pub fn like(expr: impl Into<String>, pattern: impl Into<Value>) -> Self {
        Predicate::Like(Comparison::new(expr, pattern))
    }

    /// `expr in (:p0, :p1, ...)`. An empty list renders `1=0`.
    pub fn in_list<V: Into<Value>>(expr: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In {
            expr: expr.into(),
            values: values.into_iter().map(Into::into).collect(),
            params: Vec::new(),
        }
    }

    pub fn is_null(expr: impl Into<String>) -> Self {
        Predicate::IsNull(expr.into())
    }

    pub fn is_not_null(expr: impl Into<String>) -> Self {
        Predicate::IsNotNull(expr.into())
    }

    /// Start an `exists` sub-query over `table`.
    pub fn exists(table: impl Into<String>) -> Exists {
        Exists::new(table)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: impl Into<Predicate>) -> Self {
        Predicate::Not(Box::new(child.into()))
    }

    pub fn and(children: Vec<Predicate>) -> Self {
        Predicate::And(children)
    }

    pub fn or(children: Vec<Predicate>) -> Self {
        Predicate::Or(children)
    }

    pub fn bitmask_all(expr: impl Into<String>, mask: i64) -> Self {
        Predicate::BitmaskAll(Comparison::new(expr, mask))
    }

    pub fn bitmask_any(expr: impl Into<String>, mask: i64) -> Self {
        Predicate::BitmaskAny(Comparison::new(expr, mask))
    }

    pub fn literal(sql: impl Into<String>) -> Self {
        Predicate::Literal(sql.into())
    }

    /// Allocate parameters for every value in this predicate, depth first in
    /// declaration order.
    pub fn initialize(&mut self, ctx: &mut ParameterContext) {
        match self {
            Predicate::Eq(c)
            | Predicate::Ne(c)
            | Predicate::Gt(c)
            | Predicate::Gte(c)
            | Predicate::Lt(c)
            | Predicate::Lte(c)
            | Predicate::Like(c)
            | Predicate::BitmaskAll(c)
            | Predicate::BitmaskAny(c) => c.initialize(ctx),
            Predicate::In { values, params, .. } => {
                *params = values.iter().map(|v| ctx.allocate_value(v.clone())).collect();
            }
            Predicate::Exists(exists) => exists.initialize(ctx),
            Predicate::Not(child) => child.initialize(ctx),
            Predicate::And(children) | Predicate::Or(children) => {
                for child in children {
                    child.initialize(ctx);
                }
            }
            Predicate::IsNull(_) | Predicate::IsNotNull(_) | Predicate::Literal(_) => {}
        }
    }

    /// SQL text for this predicate, referencing allocated names as `:name`.
    pub fn render(&self) -> String {
        match self {
            Predicate::Eq(c) => c.render("="),
            Predicate::Ne(c) => c.render("<>"),
            Predicate::Gt(c) => c.render(">"),
            Predicate::Gte(c) => c.render(">="),
            Predicate::Lt(c) => c.render("<"),
            Predicate::Lte(c) => c.render("<="),
            Predicate::Like(c) => c.render("like"),
            Predicate::In { expr, values, params } => {
                if values.is_empty() {
                    return "1=0".to_string();
                }
                let names: Vec<String> = if params.len() == values.len() {
                    params.iter().map(|p| format!(":{p}")).collect()
                } else {
                    values.iter().map(|_| format!(":{UNALLOCATED}")).collect()
                };
                format!("{expr} in ({})", names.join(", "))
            }
            Predicate::IsNull(expr) => format!("{expr} is null"),
            Predicate::IsNotNull(expr) => format!("{expr} is not null"),
            Predicate::Exists(exists) => exists.render(),
            Predicate::Not(child) => format!("not ({})", child.render()),
            Predicate::And(children) => render_group(children, " and ", "1=1"),
            Predicate::Or(children) => render_group(children, " or ", "1=0"),
            Predicate::BitmaskAll(c) => {
                format!("({} & :{p}) = :{p}", c.expr, p = c.param())
            }
            Predicate::BitmaskAny(c) => format!("({} & :{}) <> 0", c.expr, c.param()),
            Predicate::Literal(sql) => sql.clone(),
        }
    }
}

fn render_group(children: &[Predicate], sep: &str, empty: &str) -> String {
    if children.is_empty() {
        return empty.to_string();
    }
    let parts: Vec<String> = children.iter().map(Predicate::render).collect();
    format!("({})", parts.join(sep))
}

impl From<&str> for Predicate {
    fn from(sql: &str) -> Self {
        Predicate::Literal(sql.to_string())
    }
}

impl From<String> for Predicate {
    fn from(sql: String) -> Self {
        Predicate::Literal(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init(mut p: Predicate) -> (String, ParameterContext) {
        let mut ctx = ParameterContext::new();
        p.initialize(&mut ctx);
        (p.render(), ctx)
    }

    #[test]
    fn comparisons_allocate_one_parameter() {
        let (sql, ctx) = init(Predicate::gte("rank", "1"));
        assert_eq!(sql, "rank >= :param0");
        assert_eq!(ctx.get("param0"), Some(&Value::from("1")));

        assert_eq!(init(Predicate::ne("rank", 1)).0, "rank <> :param0");
        assert_eq!(init(Predicate::like("name", "Bob%")).0, "name like :param0");
    }

    #[test]
    fn groups_initialize_in_declaration_order() {
        let (sql, ctx) = init(Predicate::or(vec![
            Predicate::and(vec![Predicate::eq("a", 1), Predicate::gt("b", 2)]),
            Predicate::not(Predicate::lt("c", 3)),
            Predicate::is_null("d"),
        ]));
        assert_eq!(
            sql,
            "((a = :param0 and b > :param1) or not (c < :param2) or d is null)"
        );
        assert_eq!(ctx.get("param2"), Some(&Value::Int(3)));
        assert_eq!(ctx.allocated(), 3);
    }

    #[test]
    fn empty_in_is_false_and_allocates_nothing() {
        let (sql, ctx) = init(Predicate::in_list("name", Vec::<String>::new()));
        assert_eq!(sql, "1=0");
        assert!(ctx.is_empty());
        assert_eq!(ctx.allocated(), 0);
    }

    #[test]
    fn bitmask_predicates() {
        let (sql, ctx) = init(Predicate::bitmask_all("flags", 6));
        assert_eq!(sql, "(flags & :param0) = :param0");
        assert_eq!(ctx.len(), 1);

        assert_eq!(
            init(Predicate::bitmask_any("flags", 6)).0,
            "(flags & :param0) <> 0"
        );
    }

    #[test]
    fn exists_shares_outer_context() {
        let mut ctx = ParameterContext::new();
        ctx.allocate_value("outer");
        let mut p: Predicate = Predicate::exists("SickDay sd")
            .join("Dow w on w.id = sd.dow_id")
            .where_("sd.emp_id = e.id")
            .and_pred(Predicate::eq("w.name", "Monday"))
            .into();
        p.initialize(&mut ctx);
        assert_eq!(
            p.render(),
            "exists (select 1 from SickDay sd join Dow w on w.id = sd.dow_id where sd.emp_id = e.id and w.name = :param1)"
        );
        assert_eq!(ctx.get("param1"), Some(&Value::from("Monday")));
    }

    #[test]
    fn literal_is_verbatim() {
        assert_eq!(init(Predicate::from("x between 1 and 3")).0, "x between 1 and 3");
    }
}
