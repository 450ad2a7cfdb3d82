use sqlx::{Postgres, QueryBuilder};

use crate::application::search::SearchFilter;

use super::PostgresRepositories;

impl PostgresRepositories {
    /// Appends `AND published AND (text match) [AND category membership]`.
    ///
    /// Expects the `posts p` alias and a preceding `WHERE` clause.
    pub(super) fn push_search_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &SearchFilter) {
        let pattern = format!("%{}%", escape_like(&filter.term));

        qb.push(" AND p.published AND (p.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.excerpt ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.content ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(
            " OR EXISTS (SELECT 1 FROM post_categories pc \
             INNER JOIN categories c ON c.id = pc.category_id \
             WHERE pc.post_id = p.id AND c.name ILIKE ",
        );
        qb.push_bind(pattern.clone());
        qb.push(
            ") OR EXISTS (SELECT 1 FROM post_tags pt \
             INNER JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.post_id = p.id AND t.name ILIKE ",
        );
        qb.push_bind(pattern);
        qb.push("))");

        if let Some(category) = filter.category.as_ref() {
            qb.push(
                " AND EXISTS (SELECT 1 FROM post_categories pc \
                 INNER JOIN categories c ON c.id = pc.category_id \
                 WHERE pc.post_id = p.id AND c.slug = ",
            );
            qb.push_bind(category.clone());
            qb.push(")");
        }
    }
}

/// Escapes `LIKE` wildcards so the term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
