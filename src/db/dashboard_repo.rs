// src/db/dashboard_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Role, User},
        dashboard::{KpiCounts, TrendPoint, UserStat},
        instruction::Instruction,
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

// Contagens e tendência são restritas às próprias submissões quando o
// chamador é Sales; para os demais perfis o indicador é global.
fn sales_scope(user: &User) -> (&'static str, Option<Uuid>) {
    if user.role == Role::Sales {
        (" AND cre_user_id = $1", Some(user.id))
    } else {
        ("", None)
    }
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Os cards do topo
    pub async fn kpi_counts(&self, user: &User) -> Result<KpiCounts, AppError> {
        let (scope, bind) = sales_scope(user);
        let sql = format!(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'Pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'Completed') AS completed
            FROM instructions
            WHERE is_deleted = FALSE{scope}
            "#
        );

        let mut query = sqlx::query_as::<_, KpiCounts>(&sql);
        if let Some(id) = bind {
            query = query.bind(id);
        }
        let counts = query.fetch_one(&self.pool).await?;
        Ok(counts)
    }

    // 2. Gráfico de linha: submissões por dia corrido nos últimos 7 dias.
    // Dias sem submissão são preenchidos com zero no serviço.
    pub async fn trend_last_7_days(&self, user: &User) -> Result<Vec<TrendPoint>, AppError> {
        let (scope, bind) = sales_scope(user);
        let sql = format!(
            r#"
            SELECT
                to_char(created_at, 'YYYY-MM-DD') AS date,
                COUNT(*) AS count
            FROM instructions
            WHERE is_deleted = FALSE
              AND created_at >= (CURRENT_DATE - INTERVAL '6 days'){scope}
            GROUP BY 1
            ORDER BY 1 ASC
            "#
        );

        let mut query = sqlx::query_as::<_, TrendPoint>(&sql);
        if let Some(id) = bind {
            query = query.bind(id);
        }
        let data = query.fetch_all(&self.pool).await?;
        Ok(data)
    }

    // 3. Gráfico de barras: submissões por usuário de vendas
    pub async fn submissions_per_sales_user(&self) -> Result<Vec<UserStat>, AppError> {
        let data = sqlx::query_as::<_, UserStat>(
            r#"
            SELECT
                u.username AS name,
                COUNT(i.id) AS count
            FROM users u
            LEFT JOIN instructions i
                ON i.cre_user_id = u.id AND i.is_deleted = FALSE
            WHERE u.role = 'Sales'
            GROUP BY u.id, u.username
            ORDER BY u.username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(data)
    }

    // 4. As 5 submissões visíveis mais recentes (escopo completo do perfil)
    pub async fn recent_visible(&self, user: &User) -> Result<Vec<Instruction>, AppError> {
        let (scope, bind): (&str, Option<Uuid>) = match user.role {
            Role::Admin => ("", None),
            Role::Sales => (" AND cre_user_id = $1", Some(user.id)),
            Role::Commercial => (" AND assigned_commercial_user_id = $1", Some(user.id)),
        };
        let sql = format!(
            r#"
            SELECT * FROM instructions
            WHERE is_deleted = FALSE{scope}
            ORDER BY created_at DESC
            LIMIT 5
            "#
        );

        let mut query = sqlx::query_as::<_, Instruction>(&sql);
        if let Some(id) = bind {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
