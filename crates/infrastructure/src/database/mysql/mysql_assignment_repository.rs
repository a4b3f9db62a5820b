use assignment_consumer_core::{Assignment, AssignmentRepository, ConsumerResult};
use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, instrument};

const INSERT_ASSIGNMENT: &str = r#"
    INSERT INTO assignments (name, description, author, due_date, publish_date)
    VALUES (?, ?, ?, ?, ?)
"#;

pub struct MySqlAssignmentRepository {
    pool: MySqlPool,
}

impl MySqlAssignmentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepository for MySqlAssignmentRepository {
    #[instrument(skip(self, assignment), fields(assignment.name = %assignment.name))]
    async fn create(&self, assignment: &Assignment) -> ConsumerResult<u64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(INSERT_ASSIGNMENT)
            .bind(&assignment.name)
            .bind(&assignment.description)
            .bind(&assignment.author)
            .bind(assignment.due_date)
            .bind(assignment.publish_date)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let id = result.last_insert_id();
        debug!(assignment.id = id, "作业记录已创建");
        Ok(id)
    }
}
