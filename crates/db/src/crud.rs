use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    FromQueryResult, IdenStatic, IntoActiveModel, Iterable, Order, PaginatorTrait,
    PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Select, Value,
};

use crate::types::{Page, Pagination};

/// Storage-assigned identifier shared by every table.
pub type Id = i32;

/// Rows handled by the generic CRUD layer expose their assigned key.
pub trait IdModel {
    fn id(&self) -> Id;
}

/// Equality predicates AND-ed together. Keys that do not name a column of
/// the target entity are skipped.
pub type Filters = Vec<(&'static str, Value)>;

/// Table-agnostic storage primitives for one entity. All operations are
/// generic over the connection so callers can pass a transaction instead
/// of the shared handle.
pub struct Crud<E>(PhantomData<E>);

impl<E> Crud<E>
where
    E: EntityTrait,
    E::Model: IdModel + FromQueryResult + Send + Sync + 'static,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Id>,
{
    fn id_column() -> E::Column {
        E::PrimaryKey::iter()
            .next()
            .expect("entity defines a primary key")
            .into_column()
    }

    fn column_named(name: &str) -> Option<E::Column> {
        E::Column::iter().find(|column| column.as_str() == name)
    }

    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: Id) -> Result<Option<E::Model>, DbErr> {
        E::find_by_id(id).one(db).await
    }

    pub async fn get_many_by_ids<C: ConnectionTrait>(
        db: &C,
        ids: Vec<Id>,
    ) -> Result<Vec<E::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        E::find().filter(Self::id_column().is_in(ids)).all(db).await
    }

    pub async fn create<C, A>(db: &C, row: A) -> Result<Id, DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        Ok(row.insert(db).await?.id())
    }

    pub async fn create_and_get<C, A>(db: &C, row: A) -> Result<E::Model, DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        row.insert(db).await
    }

    pub async fn create_many<C, A>(db: &C, rows: Vec<A>) -> Result<Vec<Id>, DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(row.insert(db).await?.id());
        }
        Ok(ids)
    }

    pub async fn create_and_get_many<C, A>(db: &C, rows: Vec<A>) -> Result<Vec<E::Model>, DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        let mut models = Vec::with_capacity(rows.len());
        for row in rows {
            models.push(row.insert(db).await?);
        }
        Ok(models)
    }

    /// Full-row update keyed by the row's primary key. Fails with
    /// `DbErr::RecordNotUpdated` when no row matches.
    pub async fn update<C, A>(db: &C, row: A) -> Result<Id, DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        Ok(row.update(db).await?.id())
    }

    pub async fn update_and_get<C, A>(db: &C, row: A) -> Result<E::Model, DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        row.update(db).await
    }

    /// Sequential per-row update; not atomic as a set.
    pub async fn update_many<C, A>(db: &C, rows: Vec<A>) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
        A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
        E::Model: IntoActiveModel<A>,
    {
        for row in rows {
            row.update(db).await?;
        }
        Ok(())
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Id) -> Result<(), DbErr> {
        E::delete_by_id(id).exec(db).await?;
        Ok(())
    }

    pub async fn delete_many<C: ConnectionTrait>(db: &C, ids: Vec<Id>) -> Result<(), DbErr> {
        if ids.is_empty() {
            return Ok(());
        }
        E::delete_many()
            .filter(Self::id_column().is_in(ids))
            .exec(db)
            .await?;
        Ok(())
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
        E::find().count(db).await
    }

    pub async fn get_all<C: ConnectionTrait>(db: &C) -> Result<Vec<E::Model>, DbErr> {
        E::find().all(db).await
    }

    pub fn apply_filters(mut select: Select<E>, filters: &Filters) -> Select<E> {
        for (name, value) in filters {
            match Self::column_named(name) {
                Some(column) => select = select.filter(column.eq(value.clone())),
                None => tracing::debug!(column = *name, "ignoring filter on unknown column"),
            }
        }
        select
    }

    pub fn apply_pagination(mut select: Select<E>, pagination: &Pagination) -> Select<E> {
        match Self::column_named(&pagination.order_by) {
            Some(column) => {
                let order = if pagination.ascending {
                    Order::Asc
                } else {
                    Order::Desc
                };
                select = select.order_by(column, order);
            }
            None => {
                tracing::debug!(column = %pagination.order_by, "ignoring order by unknown column")
            }
        }
        if pagination.page > 0 && pagination.page_size > 0 {
            select = select
                .limit(pagination.page_size)
                .offset((pagination.page - 1) * pagination.page_size);
        }
        select
    }

    pub async fn count_filtered<C: ConnectionTrait>(
        db: &C,
        filters: &Filters,
    ) -> Result<u64, DbErr> {
        Self::apply_filters(E::find(), filters).count(db).await
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filters: &Filters,
        pagination: &Pagination,
    ) -> Result<Vec<E::Model>, DbErr> {
        Self::apply_pagination(Self::apply_filters(E::find(), filters), pagination)
            .all(db)
            .await
    }

    /// `total` counts every row matching `filters`, independent of the
    /// page bounds; `data` is the page slice under the same predicate.
    pub async fn get_page<C: ConnectionTrait>(
        db: &C,
        filters: &Filters,
        pagination: &Pagination,
    ) -> Result<Page<E::Model>, DbErr> {
        let total = Self::count_filtered(db, filters).await?;
        let data = Self::list(db, filters, pagination).await?;
        Ok(Page { data, total })
    }
}
