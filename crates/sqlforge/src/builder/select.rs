use super::{SqlBuilder, append_list};
use crate::error::{OrmError, OrmResult};
use std::fmt;

/// One entry of the select list.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectColumn {
    /// A column name or expression, e.g. `name as n`.
    Expr(String),
    /// A correlated sub-select rendered as `(<select>) as alias`.
    SubSelect(SubSelectBuilder),
}

impl fmt::Display for SelectColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectColumn::Expr(expr) => f.write_str(expr),
            SelectColumn::SubSelect(sub) => f.write_str(&sub.to_sql()),
        }
    }
}

/// SELECT statement builder.
///
/// Render order: `select [distinct] columns from tables [with (hints)] joins
/// left-joins where group-by having unions order-by [for update [nowait]]
/// [limit] [offset]`. An empty column list renders as `*`.
///
/// `Clone` is a full structural copy: sub-selects and unions are owned, so a
/// cloned builder can be extended without affecting the original.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectBuilder {
    distinct: bool,
    columns: Vec<SelectColumn>,
    tables: Vec<String>,
    table_hints: Vec<String>,
    joins: Vec<String>,
    left_joins: Vec<String>,
    wheres: Vec<String>,
    group_bys: Vec<String>,
    havings: Vec<String>,
    unions: Vec<SelectBuilder>,
    order_bys: Vec<String>,
    for_update: bool,
    no_wait: bool,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a select over a single table expression, e.g. `Employee e`.
    pub fn from_table(table: impl Into<String>) -> Self {
        Self::new().from(table)
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(SelectColumn::Expr(name.into()));
        self
    }

    /// Add a column and group by it in one step.
    pub fn column_grouped(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.group_bys.push(name.clone());
        self.columns.push(SelectColumn::Expr(name));
        self
    }

    pub fn sub_select(mut self, sub: SubSelectBuilder) -> Self {
        self.columns.push(SelectColumn::SubSelect(sub));
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.tables.push(table.into());
        self
    }

    /// Add a table hint, rendered as `with (hint, ...)` after the table list.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.table_hints.push(hint.into());
        self
    }

    /// Inner join; pass the table and its `on` condition, e.g. `Dept d on e.dept_id = d.id`.
    pub fn join(mut self, join: impl Into<String>) -> Self {
        self.joins.push(join.into());
        self
    }

    pub fn left_join(mut self, join: impl Into<String>) -> Self {
        self.left_joins.push(join.into());
        self
    }

    pub fn where_(mut self, expr: impl Into<String>) -> Self {
        self.wheres.push(expr.into());
        self
    }

    /// Alias for [`SelectBuilder::where_`].
    pub fn and(self, expr: impl Into<String>) -> Self {
        self.where_(expr)
    }

    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.group_bys.push(expr.into());
        self
    }

    pub fn having(mut self, expr: impl Into<String>) -> Self {
        self.havings.push(expr.into());
        self
    }

    /// Append `other` as `union <other>`. Unions render before `order by`,
    /// so the ordering applies to the combined result.
    pub fn union(mut self, other: SelectBuilder) -> Self {
        self.unions.push(other);
        self
    }

    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.order_bys.push(expr.into());
        self
    }

    pub fn order_by_dir(mut self, expr: impl Into<String>, ascending: bool) -> Self {
        let dir = if ascending { "asc" } else { "desc" };
        self.order_bys.push(format!("{} {dir}", expr.into()));
        self
    }

    pub fn for_update(mut self) -> Self {
        self.for_update = true;
        self
    }

    /// Add `nowait` to a `for update` select.
    ///
    /// Fails with [`OrmError::InvalidState`] unless [`SelectBuilder::for_update`]
    /// was called first.
    pub fn no_wait(mut self) -> OrmResult<Self> {
        if !self.for_update {
            return Err(OrmError::InvalidState(
                "no_wait requires for_update".to_string(),
            ));
        }
        self.no_wait = true;
        Ok(self)
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn unions(&self) -> &[SelectBuilder] {
        &self.unions
    }

    pub fn is_for_update(&self) -> bool {
        self.for_update
    }

    pub(crate) fn push_where(&mut self, expr: String) {
        self.wheres.push(expr);
    }
}

impl SqlBuilder for SelectBuilder {
    fn to_sql(&self) -> String {
        let mut sql = String::from("select ");
        if self.distinct {
            sql.push_str("distinct ");
        }
        if self.columns.is_empty() {
            sql.push('*');
        } else {
            append_list(&mut sql, &self.columns, "", ", ");
        }
        append_list(&mut sql, &self.tables, " from ", ", ");
        if !self.table_hints.is_empty() {
            append_list(&mut sql, &self.table_hints, " with (", ", ");
            sql.push(')');
        }
        append_list(&mut sql, &self.joins, " join ", " join ");
        append_list(&mut sql, &self.left_joins, " left join ", " left join ");
        append_list(&mut sql, &self.wheres, " where ", " and ");
        append_list(&mut sql, &self.group_bys, " group by ", ", ");
        append_list(&mut sql, &self.havings, " having ", " and ");
        for union in &self.unions {
            sql.push_str(" union ");
            sql.push_str(&union.to_sql());
        }
        append_list(&mut sql, &self.order_bys, " order by ", ", ");
        if self.for_update {
            sql.push_str(" for update");
            if self.no_wait {
                sql.push_str(" nowait");
            }
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" limit {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" offset {offset}"));
        }
        sql
    }
}

impl fmt::Display for SelectBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// A select used as a column: renders `(<select>) as <alias>`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubSelectBuilder {
    alias: String,
    select: SelectBuilder,
}

impl SubSelectBuilder {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            select: SelectBuilder::new(),
        }
    }

    /// Wrap an existing select under `alias`.
    pub fn wrap(alias: impl Into<String>, select: SelectBuilder) -> Self {
        Self {
            alias: alias.into(),
            select,
        }
    }

    /// Modify the inner select.
    pub fn select(mut self, f: impl FnOnce(SelectBuilder) -> SelectBuilder) -> Self {
        self.select = f(self.select);
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn inner(&self) -> &SelectBuilder {
        &self.select
    }
}

impl SqlBuilder for SubSelectBuilder {
    fn to_sql(&self) -> String {
        format!("({}) as {}", self.select.to_sql(), self.alias)
    }
}

impl fmt::Display for SubSelectBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}
