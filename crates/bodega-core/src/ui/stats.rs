// ── Screen aggregations ──
//
// Numbers screens derive from data they already hold. Nothing here calls
// the API.

use serde::Serialize;

use crate::model::{Sale, SaleStatus, SalesStats};

/// Under this many units a product counts as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Counters over the currently fetched page of sales only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PageSalesStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// Sum of every sale's total on the page, regardless of status.
    pub revenue: f64,
}

impl PageSalesStats {
    pub fn from_sales(sales: &[Sale]) -> Self {
        sales.iter().fold(Self::default(), |mut acc, sale| {
            acc.total += 1;
            match sale.status {
                SaleStatus::Pending => acc.pending += 1,
                SaleStatus::Completed => acc.completed += 1,
                SaleStatus::Cancelled | SaleStatus::Other => {}
            }
            acc.revenue += sale.total;
            acc
        })
    }
}

/// Dashboard cards derived from the server-side sales stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_sales: u64,
    pub completed: u64,
    pub pending: u64,
    pub revenue: f64,
    pub completion_rate: f64,
    pub pending_share: f64,
    pub average_sale: f64,
}

impl DashboardMetrics {
    pub fn from_stats(stats: &SalesStats) -> Self {
        let total = stats.total_sales;
        let completed = stats.status_counts.completed;
        let pending = stats.status_counts.pending;
        Self {
            total_sales: total,
            completed,
            pending,
            revenue: stats.total_revenue,
            completion_rate: share(completed, total),
            pending_share: share(pending, total),
            average_sale: if total == 0 {
                0.0
            } else {
                stats.total_revenue / to_f64(total)
            },
        }
    }
}

fn share(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        to_f64(part) / to_f64(total) * 100.0
    }
}

// Counts here are far below 2^53, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
fn to_f64(n: u64) -> f64 {
    n as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StockLevel {
    Out,
    Low,
    Ok,
}

impl StockLevel {
    pub fn for_stock(stock: i64) -> Self {
        if stock <= 0 {
            Self::Out
        } else if stock < LOW_STOCK_THRESHOLD {
            Self::Low
        } else {
            Self::Ok
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Out => "Sin Stock",
            Self::Low => "Stock Bajo",
            Self::Ok => "Stock OK",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::StatusCounts;

    fn sale(id: &str, status: SaleStatus, total: f64) -> Sale {
        Sale {
            id: id.into(),
            products: Vec::new(),
            total,
            status,
            order_number: None,
            payment_id: None,
            user_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn page_stats_sum_every_total() {
        let sales = [
            sale("a", SaleStatus::Completed, 100.0),
            sale("b", SaleStatus::Pending, 50.0),
            sale("c", SaleStatus::Cancelled, 25.0),
        ];
        let stats = PageSalesStats::from_sales(&sales);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.completed, 1);
        assert!((stats.revenue - 175.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dashboard_metrics_divide_by_total_sales() {
        let stats = SalesStats {
            total_sales: 4,
            pending: 1,
            status_counts: StatusCounts {
                pending: 1,
                completed: 2,
            },
            total_revenue: 1000.0,
        };
        let m = DashboardMetrics::from_stats(&stats);
        assert!((m.completion_rate - 50.0).abs() < f64::EPSILON);
        assert!((m.pending_share - 25.0).abs() < f64::EPSILON);
        assert!((m.average_sale - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_stats_yield_zeroes() {
        let m = DashboardMetrics::from_stats(&SalesStats::default());
        assert!(m.completion_rate.abs() < f64::EPSILON);
        assert!(m.average_sale.abs() < f64::EPSILON);
    }

    #[test]
    fn stock_levels() {
        assert_eq!(StockLevel::for_stock(0), StockLevel::Out);
        assert_eq!(StockLevel::for_stock(9), StockLevel::Low);
        assert_eq!(StockLevel::for_stock(10), StockLevel::Ok);
        assert_eq!(StockLevel::for_stock(10).label(), "Stock OK");
    }
}
