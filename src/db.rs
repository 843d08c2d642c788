use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use rebanho_core::{
    date, EventPatch, EventRecord, EventStore, EventType, StoreError, VaccinationDetail,
};

/// Initialize database connection pool with recommended pragmas.
pub async fn init_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(5))
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

    SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
}

/// Run database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(include_str!("../migrations/001_create_events.sql"))
        .execute(pool)
        .await?;
    Ok(())
}

fn persistence(e: sqlx::Error) -> StoreError {
    StoreError::Persistence(e.to_string())
}

/// Event row as stored, dates and type tokens still in wire form.
#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    id_animal: String,
    tipo: String,
    data_do_evento: String,
    descricao: Option<String>,
}

impl EventRow {
    fn into_record(self) -> Result<EventRecord, StoreError> {
        let event_type: EventType = self
            .tipo
            .parse()
            .map_err(|_| StoreError::Persistence(format!("corrupt event type: {}", self.tipo)))?;
        let event_date = date::parse_date(&self.data_do_evento).map_err(|_| {
            StoreError::Persistence(format!("corrupt event date: {}", self.data_do_evento))
        })?;
        Ok(EventRecord {
            id: Some(self.id),
            animal_id: self.id_animal,
            event_type,
            event_date,
            description: self.descricao,
        })
    }
}

#[derive(sqlx::FromRow)]
struct VaccinationRow {
    id: i64,
    evento_id: Option<i64>,
    animal_id: String,
    tipo: String,
    lote: Option<String>,
    data_aplicacao: String,
    validade_dias: Option<i64>,
}

impl VaccinationRow {
    fn into_detail(self) -> Result<VaccinationDetail, StoreError> {
        let application_date = date::parse_date(&self.data_aplicacao).map_err(|_| {
            StoreError::Persistence(format!(
                "corrupt application date: {}",
                self.data_aplicacao
            ))
        })?;
        Ok(VaccinationDetail {
            id: Some(self.id),
            event_id: self.evento_id,
            animal_id: self.animal_id,
            vaccine_name: self.tipo,
            batch_number: self.lote,
            application_date,
            validity_days: self.validade_dias,
        })
    }
}

/// SQLite implementation of the core `EventStore`.
#[derive(Clone)]
pub struct SqliteEventStore {
    pool: SqlitePool,
}

impl SqliteEventStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_event(&self, id: i64) -> Result<EventRecord, StoreError> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, id_animal, tipo, data_do_evento, descricao FROM eventos WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(persistence)?;

        match row {
            Some(row) => row.into_record(),
            None => Err(StoreError::NotFound(id)),
        }
    }
}

#[async_trait]
impl EventStore for SqliteEventStore {
    async fn create(&self, record: EventRecord) -> Result<EventRecord, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO eventos (id_animal, tipo, data_do_evento, descricao)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.animal_id)
        .bind(record.event_type.as_str())
        .bind(date::canonical(record.event_date))
        .bind(&record.description)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(EventRecord {
            id: Some(result.last_insert_rowid()),
            ..record
        })
    }

    async fn get(&self, id: i64) -> Result<EventRecord, StoreError> {
        self.fetch_event(id).await
    }

    async fn update(&self, id: i64, patch: EventPatch) -> Result<EventRecord, StoreError> {
        let current = self.fetch_event(id).await?;
        let updated = patch.apply(&current);

        sqlx::query(
            r#"
            UPDATE eventos SET tipo = ?, data_do_evento = ?, descricao = ?
            WHERE id = ?
            "#,
        )
        .bind(updated.event_type.as_str())
        .bind(date::canonical(updated.event_date))
        .bind(&updated.description)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        // Idempotent: zero rows affected is still success.
        sqlx::query("DELETE FROM eventos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(())
    }

    async fn list_by_animal(&self, animal_id: &str) -> Result<Vec<EventRecord>, StoreError> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, id_animal, tipo, data_do_evento, descricao
            FROM eventos
            WHERE id_animal = ?
            ORDER BY data_do_evento DESC, id DESC
            "#,
        )
        .bind(animal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence)?;

        rows.into_iter().map(EventRow::into_record).collect()
    }

    async fn create_vaccination_detail(
        &self,
        detail: VaccinationDetail,
    ) -> Result<VaccinationDetail, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO vacinas (evento_id, animal_id, tipo, lote, data_aplicacao, validade_dias)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(detail.event_id)
        .bind(&detail.animal_id)
        .bind(&detail.vaccine_name)
        .bind(&detail.batch_number)
        .bind(date::canonical(detail.application_date))
        .bind(detail.validity_days)
        .execute(&self.pool)
        .await
        .map_err(persistence)?;

        Ok(VaccinationDetail {
            id: Some(result.last_insert_rowid()),
            ..detail
        })
    }

    async fn list_vaccinations(
        &self,
        animal_id: &str,
    ) -> Result<Vec<VaccinationDetail>, StoreError> {
        let rows = sqlx::query_as::<_, VaccinationRow>(
            r#"
            SELECT id, evento_id, animal_id, tipo, lote, data_aplicacao, validade_dias
            FROM vacinas
            WHERE animal_id = ?
            ORDER BY data_aplicacao DESC, id DESC
            "#,
        )
        .bind(animal_id)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence)?;

        rows.into_iter().map(VaccinationRow::into_detail).collect()
    }

    async fn has_vaccination_for_event(&self, event_id: i64) -> Result<bool, StoreError> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM vacinas WHERE evento_id = ?)")
                .bind(event_id)
                .fetch_one(&self.pool)
                .await
                .map_err(persistence)?;
        Ok(exists != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    /// Create a test database with in-memory SQLite.
    async fn setup_test_store() -> SqliteEventStore {
        let pool = init_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteEventStore::new(pool)
    }

    fn record(animal: &str, event_type: EventType, date: &str) -> EventRecord {
        EventRecord::new(
            animal.to_string(),
            event_type,
            date::parse_date(date).unwrap(),
            None,
        )
    }

    #[tokio::test]
    async fn create_and_get() {
        let store = setup_test_store().await;

        let created = store
            .create(record("animal-1", EventType::Weighing, "2024-03-01"))
            .await
            .unwrap();
        let id = created.id.unwrap();
        assert_eq!(id, 1);

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(
            fetched.event_date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = setup_test_store().await;
        assert_eq!(store.get(7).await.unwrap_err(), StoreError::NotFound(7));
    }

    #[tokio::test]
    async fn update_applies_patch_fields_only() {
        let store = setup_test_store().await;
        let created = store
            .create(record("animal-1", EventType::Consultation, "2024-03-01"))
            .await
            .unwrap();

        let patch = EventPatch {
            description: Some("routine checkup".to_string()),
            ..Default::default()
        };
        let updated = store.update(created.id.unwrap(), patch).await.unwrap();

        assert_eq!(updated.event_type, EventType::Consultation);
        assert_eq!(updated.description, Some("routine checkup".to_string()));

        let fetched = store.get(created.id.unwrap()).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let store = setup_test_store().await;
        let err = store.update(1, EventPatch::default()).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound(1));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = setup_test_store().await;
        let created = store
            .create(record("animal-1", EventType::Birth, "2024-03-01"))
            .await
            .unwrap();
        let id = created.id.unwrap();

        store.delete(id).await.unwrap();
        store.delete(id).await.unwrap();
        store.delete(404).await.unwrap();

        assert_eq!(store.get(id).await.unwrap_err(), StoreError::NotFound(id));
    }

    #[tokio::test]
    async fn list_orders_by_date_descending() {
        let store = setup_test_store().await;
        for date in ["2024-01-01", "2024-03-01", "2024-02-01"] {
            store
                .create(record("animal-1", EventType::Occurrence, date))
                .await
                .unwrap();
        }
        store
            .create(record("animal-2", EventType::Occurrence, "2024-04-01"))
            .await
            .unwrap();

        let events = store.list_by_animal("animal-1").await.unwrap();
        let dates: Vec<String> = events
            .iter()
            .map(|e| date::canonical(e.event_date))
            .collect();
        assert_eq!(dates, ["2024-03-01", "2024-02-01", "2024-01-01"]);
    }

    #[tokio::test]
    async fn vaccination_details_round_trip() {
        let store = setup_test_store().await;
        let event = store
            .create(record("animal-1", EventType::Vaccination, "2024-03-01"))
            .await
            .unwrap();

        let detail = VaccinationDetail {
            id: None,
            event_id: event.id,
            animal_id: "animal-1".to_string(),
            vaccine_name: "Aftosa".to_string(),
            batch_number: Some("L123".to_string()),
            application_date: event.event_date,
            validity_days: Some(180),
        };
        let saved = store.create_vaccination_detail(detail).await.unwrap();
        assert!(saved.id.is_some());

        assert!(store
            .has_vaccination_for_event(event.id.unwrap())
            .await
            .unwrap());
        assert!(!store.has_vaccination_for_event(999).await.unwrap());

        let listed = store.list_vaccinations("animal-1").await.unwrap();
        assert_eq!(listed, vec![saved]);
    }

    #[tokio::test]
    async fn check_constraints_reject_bad_rows() {
        let store = setup_test_store().await;

        // Unknown type token
        let result = sqlx::query(
            "INSERT INTO eventos (id_animal, tipo, data_do_evento) VALUES (?, ?, ?)",
        )
        .bind("animal-1")
        .bind("BANHO")
        .bind("2024-03-01")
        .execute(&store.pool)
        .await;
        assert!(result.is_err());

        // Non-canonical date
        let result = sqlx::query(
            "INSERT INTO eventos (id_animal, tipo, data_do_evento) VALUES (?, ?, ?)",
        )
        .bind("animal-1")
        .bind("PESAGEM")
        .bind("01/03/2024")
        .execute(&store.pool)
        .await;
        assert!(result.is_err());

        // Negative validity
        let result = sqlx::query(
            r#"
            INSERT INTO vacinas (animal_id, tipo, data_aplicacao, validade_dias)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind("animal-1")
        .bind("Aftosa")
        .bind("2024-03-01")
        .bind(-1)
        .execute(&store.pool)
        .await;
        assert!(result.is_err());
    }
}
