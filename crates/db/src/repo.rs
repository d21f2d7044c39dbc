use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult,
    IntoActiveModel, PrimaryKeyTrait,
};

use crate::{
    crud::{Crud, Filters, Id, IdModel},
    error::{AppError, EntityKind, translate_unique_violation},
    types::{Page, Pagination},
};

/// Bidirectional mapping between a domain entity and its storage row: the
/// row type never crosses this boundary. `KIND` tags the errors raised on
/// failed lookups and violated unique constraints.
pub trait Record: Sized + Send + Sync {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    const KIND: EntityKind;

    fn id(&self) -> Option<Id>;
    fn from_model(model: <Self::Entity as EntityTrait>::Model) -> Self;
    fn into_active_model(self) -> Self::ActiveModel;
}

/// Generic repository over one record type: CRUD plus serialization and
/// domain error translation. Storage errors other than missing rows and
/// unique-constraint violations propagate untranslated.
pub struct Repo<R>(PhantomData<R>);

impl<R> Repo<R>
where
    R: Record,
    <R::Entity as EntityTrait>::Model:
        IdModel + IntoActiveModel<R::ActiveModel> + FromQueryResult + Send + Sync + 'static,
    <<R::Entity as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType: From<Id>,
{
    pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: Id) -> Result<R, AppError> {
        match Crud::<R::Entity>::get_by_id(db, id).await? {
            Some(model) => Ok(R::from_model(model)),
            None => Err(AppError::NotFound(R::KIND)),
        }
    }

    pub async fn get_many_by_ids<C: ConnectionTrait>(
        db: &C,
        ids: Vec<Id>,
    ) -> Result<Vec<R>, AppError> {
        let models = Crud::<R::Entity>::get_many_by_ids(db, ids).await?;
        Ok(models.into_iter().map(R::from_model).collect())
    }

    pub async fn create<C: ConnectionTrait>(db: &C, record: R) -> Result<Id, AppError> {
        Crud::<R::Entity>::create(db, record.into_active_model())
            .await
            .map_err(|err| translate_unique_violation(R::KIND, err))
    }

    pub async fn create_and_get<C: ConnectionTrait>(db: &C, record: R) -> Result<R, AppError> {
        Crud::<R::Entity>::create_and_get(db, record.into_active_model())
            .await
            .map(R::from_model)
            .map_err(|err| translate_unique_violation(R::KIND, err))
    }

    pub async fn create_many<C: ConnectionTrait>(
        db: &C,
        records: Vec<R>,
    ) -> Result<Vec<Id>, AppError> {
        let rows = records.into_iter().map(R::into_active_model).collect();
        Crud::<R::Entity>::create_many(db, rows)
            .await
            .map_err(|err| translate_unique_violation(R::KIND, err))
    }

    pub async fn create_and_get_many<C: ConnectionTrait>(
        db: &C,
        records: Vec<R>,
    ) -> Result<Vec<R>, AppError> {
        let rows = records.into_iter().map(R::into_active_model).collect();
        let models = Crud::<R::Entity>::create_and_get_many(db, rows)
            .await
            .map_err(|err| translate_unique_violation(R::KIND, err))?;
        Ok(models.into_iter().map(R::from_model).collect())
    }

    pub async fn update<C: ConnectionTrait>(db: &C, record: R) -> Result<Id, AppError> {
        Self::require_id(&record)?;
        Crud::<R::Entity>::update(db, record.into_active_model())
            .await
            .map_err(|err| translate_unique_violation(R::KIND, err))
    }

    pub async fn update_and_get<C: ConnectionTrait>(db: &C, record: R) -> Result<R, AppError> {
        Self::require_id(&record)?;
        Crud::<R::Entity>::update_and_get(db, record.into_active_model())
            .await
            .map(R::from_model)
            .map_err(|err| translate_unique_violation(R::KIND, err))
    }

    pub async fn update_many<C: ConnectionTrait>(db: &C, records: Vec<R>) -> Result<(), AppError> {
        for record in &records {
            Self::require_id(record)?;
        }
        let rows = records.into_iter().map(R::into_active_model).collect();
        Crud::<R::Entity>::update_many(db, rows)
            .await
            .map_err(|err| translate_unique_violation(R::KIND, err))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Id) -> Result<(), AppError> {
        Crud::<R::Entity>::delete(db, id).await?;
        Ok(())
    }

    pub async fn delete_many<C: ConnectionTrait>(db: &C, ids: Vec<Id>) -> Result<(), AppError> {
        Crud::<R::Entity>::delete_many(db, ids).await?;
        Ok(())
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, AppError> {
        Ok(Crud::<R::Entity>::count(db).await?)
    }

    pub async fn get_all<C: ConnectionTrait>(db: &C) -> Result<Vec<R>, AppError> {
        let models = Crud::<R::Entity>::get_all(db).await?;
        Ok(models.into_iter().map(R::from_model).collect())
    }

    pub async fn count_filtered<C: ConnectionTrait>(
        db: &C,
        filters: &Filters,
    ) -> Result<u64, AppError> {
        Ok(Crud::<R::Entity>::count_filtered(db, filters).await?)
    }

    pub async fn list<C: ConnectionTrait>(
        db: &C,
        filters: &Filters,
        pagination: &Pagination,
    ) -> Result<Vec<R>, AppError> {
        let models = Crud::<R::Entity>::list(db, filters, pagination).await?;
        Ok(models.into_iter().map(R::from_model).collect())
    }

    pub async fn get_page<C: ConnectionTrait>(
        db: &C,
        filters: &Filters,
        pagination: &Pagination,
    ) -> Result<Page<R>, AppError> {
        let page = Crud::<R::Entity>::get_page(db, filters, pagination).await?;
        Ok(page.map(R::from_model))
    }

    fn require_id(record: &R) -> Result<(), AppError> {
        if record.id().is_none() {
            return Err(AppError::Database(DbErr::Custom(format!(
                "cannot update a {} that has not been persisted",
                R::KIND
            ))));
        }
        Ok(())
    }
}
