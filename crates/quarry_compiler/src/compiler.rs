//! SQL rendering of effective views.

use crate::{apply_override, render_expression};
use derive_getters::Getters;
use quarry_core::{
    Catalog, Clause, FromItem, LimitStyle, RuntimeParams, ScalarValue, SelectItem, SelectSpec,
    View,
};
use quarry_error::{ViewError, ViewErrorKind, ViewResult};
use serde::Serialize;
use tracing::{debug, instrument};

/// Output of a successful compilation.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct CompiledView {
    /// Complete SQL statement with positional placeholders
    sql: String,
    /// Bind values in placeholder order (WHERE binds, then HAVING binds)
    binds: Vec<ScalarValue>,
    /// Column headers in select order
    headers: Vec<String>,
    /// Connection the statement is meant for
    connection: String,
    /// Dialect the statement was rendered for
    dialect: String,
}

/// Compiles views against a catalog of connections, dialects and expressions.
#[derive(Debug, Clone)]
pub struct ViewCompiler {
    catalog: Catalog,
}

#[derive(Default)]
struct FilterClauses {
    where_parts: Vec<String>,
    where_binds: Vec<ScalarValue>,
    having_parts: Vec<String>,
    having_binds: Vec<ScalarValue>,
}

impl ViewCompiler {
    /// Create a compiler over a catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// The catalog views are compiled against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Compile a view with runtime parameters.
    ///
    /// # Errors
    ///
    /// Fails without partial output on an unknown connection, dialect or catalog
    /// expression, an aggregate without arguments, an unknown or incomplete
    /// select item, an override filter without a condition, or a malformed
    /// from/join list.
    #[instrument(
        skip(self, view, params),
        fields(view_id = %view.id(), params = params.len())
    )]
    pub fn compile(&self, view: &View, params: &RuntimeParams) -> ViewResult<CompiledView> {
        let declared = view
            .connection()
            .as_deref()
            .unwrap_or_else(|| self.catalog.default_connection_name());
        let connection = self.catalog.connection(declared).ok_or_else(|| {
            ViewError::new(ViewErrorKind::UnknownConnection(declared.to_string()))
        })?;
        let dialect = connection.dialect().clone();

        let effective = match view.override_for(&dialect) {
            Some(ovr) => {
                debug!(dialect = %dialect, "Applying dialect override");
                apply_override(view, ovr)?
            }
            None => view.clone(),
        };

        // Connection and dialect stay the ones resolved before overrides
        let connection_name = declared.to_string();

        let (select_parts, headers) = self.render_select(effective.select(), &dialect)?;
        let from_clause = render_from(effective.id(), effective.from_items())?;
        let filters = render_filters(&effective, params);
        let (top_prefix, limit_suffix) = self.render_limit(&effective, &dialect)?;

        let mut sql = format!("SELECT {}{}{}", top_prefix, select_parts.join(", "), from_clause);
        let clauses = [
            join_clause("WHERE", " AND ", &filters.where_parts),
            join_clause("GROUP BY", ", ", effective.group_by()),
            join_clause("HAVING", " AND ", &filters.having_parts),
            join_clause("ORDER BY", ", ", effective.order_by()),
            limit_suffix,
        ];
        for clause in clauses.iter().filter(|c| !c.is_empty()) {
            sql.push(' ');
            sql.push_str(clause);
        }

        let mut binds = filters.where_binds;
        binds.extend(filters.having_binds);

        debug!(
            connection = %connection_name,
            dialect = %dialect,
            binds = binds.len(),
            columns = headers.len(),
            "Compiled view"
        );

        Ok(CompiledView {
            sql,
            binds,
            headers,
            connection: connection_name,
            dialect,
        })
    }

    fn render_select(
        &self,
        items: &[SelectSpec],
        dialect: &str,
    ) -> ViewResult<(Vec<String>, Vec<String>)> {
        let mut parts = Vec::with_capacity(items.len());
        let mut headers = Vec::with_capacity(items.len());

        for spec in items {
            let item = spec.resolve()?;
            let rendered = match &item {
                SelectItem::Column { expr, alias, .. } => format!("{} AS {}", expr, alias),
                SelectItem::Expr {
                    reference, alias, ..
                } => {
                    let sql = render_expression(&self.catalog, reference, dialect)?;
                    format!("{} AS {}", sql, alias)
                }
                SelectItem::Agg {
                    func,
                    args,
                    distinct,
                    alias,
                    ..
                } => {
                    if args.is_empty() {
                        return Err(ViewError::new(ViewErrorKind::MissingArguments(
                            alias.clone(),
                        )));
                    }
                    let distinct = if *distinct { "DISTINCT " } else { "" };
                    format!(
                        "{}({}{}) AS {}",
                        func.to_uppercase(),
                        distinct,
                        args.join(", "),
                        alias
                    )
                }
            };
            headers.push(item.header().to_string());
            parts.push(rendered);
        }

        Ok((parts, headers))
    }

    /// Returns `(prefix after SELECT, trailing clause)`.
    fn render_limit(&self, view: &View, dialect: &str) -> ViewResult<(String, String)> {
        let Some(limit) = view.limit() else {
            return Ok((String::new(), String::new()));
        };
        let config = self
            .catalog
            .dialect(dialect)
            .ok_or_else(|| ViewError::new(ViewErrorKind::UnknownDialect(dialect.to_string())))?;
        let Some(limit_config) = config.limit() else {
            debug!(dialect = %dialect, "Dialect has no limit syntax, limit dropped");
            return Ok((String::new(), String::new()));
        };

        let rows = *limit.rows();
        Ok(match limit_config.style() {
            LimitStyle::Top => (format!("{} ", limit_config.render(rows, 0)), String::new()),
            LimitStyle::FetchFirst => (String::new(), limit_config.render(rows, 0)),
            LimitStyle::Limit => (
                String::new(),
                limit_config.render(rows, limit.offset().unwrap_or(0)),
            ),
            LimitStyle::Unknown => {
                debug!(dialect = %dialect, "Unknown limit style, limit dropped");
                (String::new(), String::new())
            }
        })
    }
}

fn render_from(view_id: &str, items: &[FromItem]) -> ViewResult<String> {
    let (base, joins) = items
        .split_first()
        .ok_or_else(|| ViewError::new(ViewErrorKind::EmptyFrom(view_id.to_string())))?;

    let mut out = format!(" FROM {} {}", base.table(), base.alias());
    for item in joins {
        let join = item
            .join()
            .as_ref()
            .ok_or_else(|| ViewError::new(ViewErrorKind::MissingJoin(item.table().clone())))?;
        out.push_str(&format!(
            " {} JOIN {} {} ON {}",
            join.join_type(),
            item.table(),
            item.alias(),
            join.on()
        ));
    }
    Ok(out)
}

fn render_filters(view: &View, params: &RuntimeParams) -> FilterClauses {
    let mut clauses = FilterClauses::default();

    for filter in view.filters() {
        if !filter.is_active(params) {
            continue;
        }
        let values = filter.resolve_values(params);
        if values.iter().all(ScalarValue::is_null) {
            debug!(filter_id = %filter.id(), "Filter has no values, skipped");
            continue;
        }

        let condition = format!("({})", filter.condition());
        match filter.clause() {
            Clause::Where => {
                clauses.where_parts.push(condition);
                clauses.where_binds.extend(values);
            }
            Clause::Having => {
                clauses.having_parts.push(condition);
                clauses.having_binds.extend(values);
            }
        }
    }

    clauses
}

fn join_clause(keyword: &str, separator: &str, parts: &[String]) -> String {
    if parts.is_empty() {
        String::new()
    } else {
        format!("{} {}", keyword, parts.join(separator))
    }
}
