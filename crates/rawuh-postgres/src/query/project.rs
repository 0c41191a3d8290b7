//! Project repository.

use std::future::Future;

use diesel::dsl::now;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::{Predicate, mismatched_term, ordered_predicate, text_predicate};
use crate::model::{NewProject, Project, UpdateProject};
use crate::schema::projects::{self, dsl};
use crate::types::{
    FilterTerm, FilterValue, Page, Pagination, ProjectFilter, ProjectFilterColumn, ProjectSortBy,
    ProjectSortField, SortOrder,
};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY};

/// Repository for project database operations.
pub trait ProjectRepository {
    /// Creates a new project.
    fn create_project(
        &mut self,
        project: NewProject,
    ) -> impl Future<Output = PgResult<Project>> + Send;

    /// Finds a project by ID.
    fn find_project(
        &mut self,
        project_id: i64,
    ) -> impl Future<Output = PgResult<Option<Project>>> + Send;

    /// Updates a project, returning `None` when no row matched.
    fn update_project(
        &mut self,
        project_id: i64,
        changes: UpdateProject,
    ) -> impl Future<Output = PgResult<Option<Project>>> + Send;

    /// Deletes a project and, by cascade, its events and guests.
    ///
    /// Returns whether a row was deleted.
    fn delete_project(&mut self, project_id: i64) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists projects.
    ///
    /// `scope` restricts the listing to a single project; `None` lists all.
    /// Rows are ordered by `project_id` when no sort is given.
    fn list_projects(
        &mut self,
        scope: Option<i64>,
        filter: ProjectFilter,
        sort_by: Option<ProjectSortBy>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Page<Project>>> + Send;
}

fn project_predicate(
    term: &FilterTerm<ProjectFilterColumn>,
) -> PgResult<Predicate<projects::table>> {
    use ProjectFilterColumn as C;

    let predicate = match (term.column, term.value.clone()) {
        (C::ProjectName, FilterValue::Text(v)) => {
            text_predicate!(projects::table, dsl::project_name, term.op, v)
        }
        (C::StatusDesc, FilterValue::Text(v)) => {
            text_predicate!(projects::table, dsl::status_desc, term.op, v)
        }
        (C::Status, FilterValue::Integer(v)) => {
            ordered_predicate!(projects::table, dsl::status, term.op, v)
        }
        (C::CreatedAt, FilterValue::Timestamp(v)) => ordered_predicate!(
            projects::table,
            dsl::created_at,
            term.op,
            jiff_diesel::Timestamp::from(v)
        ),
        (C::UpdatedAt, FilterValue::Timestamp(v)) => ordered_predicate!(
            projects::table,
            dsl::updated_at,
            term.op,
            jiff_diesel::Timestamp::from(v)
        ),
        _ => None,
    };

    predicate.ok_or_else(|| mismatched_term(term))
}

fn filtered_projects(
    scope: Option<i64>,
    filter: &ProjectFilter,
) -> PgResult<projects::BoxedQuery<'static, Pg>> {
    let mut query = projects::table.into_boxed();

    if let Some(project_id) = scope {
        query = query.filter(dsl::project_id.eq(project_id));
    }

    for term in filter.terms() {
        query = query.filter(project_predicate(term)?);
    }

    Ok(query)
}

/// Orders by the requested column, or the primary key, then applies paging.
fn sorted_projects(
    query: projects::BoxedQuery<'static, Pg>,
    sort_by: Option<ProjectSortBy>,
    pagination: Pagination,
) -> projects::BoxedQuery<'static, Pg> {
    let mut query = match sort_by.map(|s| (s.field, s.order)) {
        None => query.order(dsl::project_id.asc()),
        Some((ProjectSortField::CreatedAt, SortOrder::Asc)) => {
            query.order(dsl::created_at.asc())
        }
        Some((ProjectSortField::CreatedAt, SortOrder::Desc)) => {
            query.order(dsl::created_at.desc())
        }
        Some((ProjectSortField::UpdatedAt, SortOrder::Asc)) => {
            query.order(dsl::updated_at.asc())
        }
        Some((ProjectSortField::UpdatedAt, SortOrder::Desc)) => {
            query.order(dsl::updated_at.desc())
        }
        Some((ProjectSortField::Status, SortOrder::Asc)) => query.order(dsl::status.asc()),
        Some((ProjectSortField::Status, SortOrder::Desc)) => query.order(dsl::status.desc()),
        Some((ProjectSortField::ProjectName, SortOrder::Asc)) => {
            query.order(dsl::project_name.asc())
        }
        Some((ProjectSortField::ProjectName, SortOrder::Desc)) => {
            query.order(dsl::project_name.desc())
        }
    };

    if !pagination.is_unbounded() {
        query = query.limit(pagination.limit).offset(pagination.offset());
    }

    query
}

impl ProjectRepository for PgConnection {
    async fn create_project(&mut self, project: NewProject) -> PgResult<Project> {
        let project = diesel::insert_into(projects::table)
            .values(&project)
            .returning(Project::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        Ok(project)
    }

    async fn find_project(&mut self, project_id: i64) -> PgResult<Option<Project>> {
        let project = projects::table
            .filter(dsl::project_id.eq(project_id))
            .select(Project::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(project)
    }

    async fn update_project(
        &mut self,
        project_id: i64,
        changes: UpdateProject,
    ) -> PgResult<Option<Project>> {
        let project = diesel::update(projects::table)
            .filter(dsl::project_id.eq(project_id))
            .set((&changes, dsl::updated_at.eq(now)))
            .returning(Project::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)?;

        Ok(project)
    }

    async fn delete_project(&mut self, project_id: i64) -> PgResult<bool> {
        let deleted = diesel::delete(projects::table)
            .filter(dsl::project_id.eq(project_id))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        Ok(deleted > 0)
    }

    async fn list_projects(
        &mut self,
        scope: Option<i64>,
        filter: ProjectFilter,
        sort_by: Option<ProjectSortBy>,
        pagination: Pagination,
    ) -> PgResult<Page<Project>> {
        let total_rows = filtered_projects(scope, &filter)?
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        let query = filtered_projects(scope, &filter)?;
        let items = sorted_projects(query, sort_by, pagination)
            .select(Project::as_select())
            .load(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            total_rows,
            returned = items.len(),
            "listed projects"
        );

        Ok(Page::new(items, total_rows, pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::render;

    #[test]
    fn unscoped_list_has_no_tenant_predicate() {
        let query = filtered_projects(None, &ProjectFilter::default()).unwrap();
        let (sql, binds) = render(&sorted_projects(query, None, Pagination::UNBOUNDED));

        assert!(!sql.contains("WHERE"));
        assert!(sql.contains(r#"ORDER BY "projects"."project_id" ASC"#));
        assert_eq!(binds, "[]");
    }

    #[test]
    fn scoped_list_is_restricted_to_one_project() {
        let filter = ProjectFilter::parse("status = 1").unwrap();
        let query = filtered_projects(Some(3), &filter).unwrap();
        let sort_by = Some(ProjectSortBy::asc(ProjectSortField::ProjectName));
        let (sql, binds) = render(&sorted_projects(query, sort_by, Pagination::default()));

        assert!(sql.contains(r#""projects"."project_id" = $1"#));
        assert!(sql.contains(r#""projects"."status" = $2"#));
        assert!(sql.contains(r#"ORDER BY "projects"."project_name" ASC"#));
        assert!(sql.contains("LIMIT $3"));
        assert!(binds.starts_with("[3, 1, "));
    }
}
