// src/services/dashboard_service.rs

use chrono::{Duration, Local, NaiveDate};

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    middleware::rbac::{Capability, role_allows},
    models::{
        auth::User,
        dashboard::{DashboardData, TrendPoint},
    },
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn overview(&self, user: &User) -> Result<DashboardData, AppError> {
        let counts = self.repo.kpi_counts(user).await?;

        let raw_trend = self.repo.trend_last_7_days(user).await?;
        let trend = fill_missing_days(raw_trend, Local::now().date_naive());

        // O gráfico por usuário de vendas não aparece para o próprio Sales
        let user_stats = if role_allows(user.role, Capability::ViewTeamStats) {
            Some(self.repo.submissions_per_sales_user().await?)
        } else {
            None
        };

        let recent = self.repo.recent_visible(user).await?;

        Ok(DashboardData {
            counts,
            trend,
            user_stats,
            recent,
        })
    }
}

// Completa os 7 dias corridos terminando hoje; dia sem submissão vale zero
pub fn fill_missing_days(points: Vec<TrendPoint>, today: NaiveDate) -> Vec<TrendPoint> {
    (0..7)
        .map(|offset| {
            let day = today - Duration::days(6 - offset);
            let date = day.format("%Y-%m-%d").to_string();
            let count = points
                .iter()
                .find(|p| p.date == date)
                .map(|p| p.count)
                .unwrap_or(0);
            TrendPoint { date, count }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_empty_week_with_zeroes() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let week = fill_missing_days(vec![], today);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, "2025-03-04");
        assert_eq!(week[6].date, "2025-03-10");
        assert!(week.iter().all(|p| p.count == 0));
    }

    #[test]
    fn keeps_counts_for_days_with_submissions() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let week = fill_missing_days(
            vec![
                TrendPoint {
                    date: "2025-03-08".to_string(),
                    count: 3,
                },
                TrendPoint {
                    date: "2025-03-10".to_string(),
                    count: 1,
                },
            ],
            today,
        );
        assert_eq!(week[4].count, 3);
        assert_eq!(week[6].count, 1);
        assert_eq!(week[5].count, 0);
    }
}
