//! Deterministic P&L projection, viability gating and payback for one
//! location. Pure arithmetic over the cost-structure table; all the inputs
//! arrive from the caller.

use serde::Serialize;

use crate::config::{BusinessParams, DAYS_PER_MONTH};
use crate::scoring::PointScale;

/// The franchise cost-structure table, as percentages of monthly sales.
/// Rent is carried separately and reported inside fixed costs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostStructure {
    pub cogs_pct: f64,
    pub labor_pct: f64,
    pub variable_pct: f64,
    /// Fixed costs excluding rent (utilities, insurance, maintenance).
    pub fixed_pct: f64,
    /// Franchise operating royalty.
    pub royalty_pct: f64,
    /// Franchise marketing fund fee.
    pub marketing_pct: f64,
    /// Minimum net margin for the location to clear the first gate.
    pub margin_floor: f64,
    /// Maximum rent as a share of sales.
    pub rent_cap: f64,
    /// Absolute monthly sales floor, in the operating currency.
    pub sales_floor: f64,
}

impl Default for CostStructure {
    fn default() -> Self {
        Self {
            cogs_pct: 0.30,
            labor_pct: 0.20,
            variable_pct: 0.06,
            fixed_pct: 0.10,
            royalty_pct: 0.05,
            marketing_pct: 0.02,
            margin_floor: 0.10,
            rent_cap: 0.15,
            sales_floor: 300_000.0,
        }
    }
}

/// A monthly profit-and-loss projection with its viability verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub monthly_sales: f64,
    pub monthly_rent: f64,
    pub cogs: f64,
    pub labor: f64,
    pub variable_costs: f64,
    /// Fixed costs including rent.
    pub fixed_costs: f64,
    pub franchise_fees: f64,
    pub gross_profit: f64,
    pub operating_profit: f64,
    pub net_profit: f64,
    /// Net profit over sales; 0.0 when sales are zero.
    pub net_margin: f64,
    pub viable: bool,
    /// Why the first failing gate rejected the location, if any.
    pub rejection: Option<String>,
}

/// Project a monthly P&L from a sales estimate and an asking rent.
///
/// The viability gates run in a fixed order and the first failure wins:
/// net margin, then rent share of sales, then the absolute sales floor. A
/// healthy margin never overrides a later gate.
pub fn project_pl(monthly_sales: f64, monthly_rent: f64, costs: &CostStructure) -> Projection {
    let cogs = monthly_sales * costs.cogs_pct;
    let labor = monthly_sales * costs.labor_pct;
    let variable_costs = monthly_sales * costs.variable_pct;
    let fixed_costs = monthly_sales * costs.fixed_pct + monthly_rent;
    let franchise_fees = monthly_sales * (costs.royalty_pct + costs.marketing_pct);

    let gross_profit = monthly_sales - cogs;
    let operating_profit = gross_profit - labor - variable_costs - fixed_costs;
    let net_profit = operating_profit - franchise_fees;
    let net_margin = if monthly_sales > 0.0 {
        net_profit / monthly_sales
    } else {
        0.0
    };

    let rejection = if net_margin < costs.margin_floor {
        Some(format!(
            "net margin {:.1}% is below the {:.0}% floor",
            net_margin * 100.0,
            costs.margin_floor * 100.0
        ))
    } else if monthly_rent > monthly_sales * costs.rent_cap {
        Some(format!(
            "rent is {:.1}% of sales, above the {:.0}% cap",
            if monthly_sales > 0.0 {
                monthly_rent / monthly_sales * 100.0
            } else {
                100.0
            },
            costs.rent_cap * 100.0
        ))
    } else if monthly_sales < costs.sales_floor {
        Some(format!(
            "sales {:.0} are below the {:.0} monthly floor",
            monthly_sales, costs.sales_floor
        ))
    } else {
        None
    };

    Projection {
        monthly_sales,
        monthly_rent,
        cogs,
        labor,
        variable_costs,
        fixed_costs,
        franchise_fees,
        gross_profit,
        operating_profit,
        net_profit,
        net_margin,
        viable: rejection.is_none(),
        rejection,
    }
}

/// Payback tier ladder, in months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaybackTier {
    Excellent,
    Good,
    Acceptable,
    Risky,
    NotViable,
}

impl PaybackTier {
    pub fn label(&self) -> &'static str {
        match self {
            PaybackTier::Excellent => "excellent",
            PaybackTier::Good => "good",
            PaybackTier::Acceptable => "acceptable",
            PaybackTier::Risky => "risky",
            PaybackTier::NotViable => "not viable",
        }
    }
}

/// Months to recover the investment, with its tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payback {
    /// Months of net profit to cover the investment; infinite when the
    /// location never earns its investment back.
    pub months: f64,
    pub tier: PaybackTier,
    pub viable: bool,
}

/// Investment recovery period. Non-positive monthly profit means the
/// investment is never recovered: infinite months, not a division error.
pub fn payback(investment: f64, monthly_net_profit: f64) -> Payback {
    if monthly_net_profit <= 0.0 {
        return Payback {
            months: f64::INFINITY,
            tier: PaybackTier::NotViable,
            viable: false,
        };
    }
    let months = investment / monthly_net_profit;
    let tier = if months <= 12.0 {
        PaybackTier::Excellent
    } else if months <= 18.0 {
        PaybackTier::Good
    } else if months <= 24.0 {
        PaybackTier::Acceptable
    } else if months <= 36.0 {
        PaybackTier::Risky
    } else {
        PaybackTier::NotViable
    };
    Payback {
        months,
        tier,
        viable: tier != PaybackTier::NotViable,
    }
}

/// Sales multiple of the business target revenue per score bucket.
const SCORE_SALES_SCALE: PointScale = PointScale::new(&[
    (85.0, 1.15),
    (70.0, 1.0),
    (60.0, 0.9),
    (45.0, 0.75),
    (30.0, 0.55),
    (0.0, 0.35),
]);

/// Estimate monthly sales from a viability score: a bucketed multiple of the
/// revenue the business expects at its daily customer target.
pub fn sales_from_score(score: f64, business: &BusinessParams) -> f64 {
    business.target_monthly_revenue() * SCORE_SALES_SCALE.fraction(score)
}

/// Observed pedestrian flow at the frontage, for the traffic-driven estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrafficEstimate {
    pub pax_per_hour: f64,
    /// Share of passers-by that walk in and buy, 0-1.
    pub conversion_rate: f64,
    pub operating_hours: f64,
}

/// Monthly sales from pedestrian flow:
/// `pax/hr x conversion x hours x ticket x 30`. Kept as one multiplication
/// chain so two runs over the same inputs are bit-identical.
pub fn sales_from_traffic(traffic: &TrafficEstimate, average_ticket: f64) -> f64 {
    traffic.pax_per_hour
        * traffic.conversion_rate
        * traffic.operating_hours
        * average_ticket
        * DAYS_PER_MONTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_breakdown_adds_up() {
        let costs = CostStructure::default();
        let p = project_pl(800_000.0, 80_000.0, &costs);
        assert!((p.gross_profit - (p.monthly_sales - p.cogs)).abs() < 1e-9);
        let recomputed_net =
            p.monthly_sales - p.cogs - p.labor - p.variable_costs - p.fixed_costs - p.franchise_fees;
        assert!((p.net_profit - recomputed_net).abs() < 1e-9);
        assert!((p.net_margin - p.net_profit / p.monthly_sales).abs() < 1e-12);
    }

    #[test]
    fn test_healthy_projection_is_viable() {
        let costs = CostStructure::default();
        // Rent at 10% of sales leaves a 17% net margin
        let p = project_pl(800_000.0, 80_000.0, &costs);
        assert!(p.viable, "rejected: {:?}", p.rejection);
        assert!((p.net_margin - 0.17).abs() < 1e-9);
    }

    #[test]
    fn test_margin_gate_fails_first() {
        let costs = CostStructure::default();
        // Rent at 20% of sales pushes margin to 7%, below the 10% floor
        let p = project_pl(800_000.0, 160_000.0, &costs);
        assert!(!p.viable);
        assert!(p.rejection.as_ref().unwrap().contains("net margin"));
    }

    #[test]
    fn test_rent_cap_overrides_healthy_margin() {
        // Lean cost table where a 20% rent still leaves a 17% margin, so the
        // rent cap is the gate that rejects.
        let costs = CostStructure {
            cogs_pct: 0.25,
            labor_pct: 0.15,
            variable_pct: 0.05,
            fixed_pct: 0.10,
            royalty_pct: 0.05,
            marketing_pct: 0.03,
            ..CostStructure::default()
        };
        let sales = 800_000.0;
        let p = project_pl(sales, 0.20 * sales, &costs);
        assert!(p.net_margin >= costs.margin_floor);
        assert!(!p.viable);
        assert!(p.rejection.as_ref().unwrap().contains("cap"));
    }

    #[test]
    fn test_sales_floor_gate() {
        let costs = CostStructure::default();
        // Healthy ratios but tiny absolute volume
        let p = project_pl(200_000.0, 20_000.0, &costs);
        assert!(!p.viable);
        assert!(p.rejection.as_ref().unwrap().contains("floor"));
    }

    #[test]
    fn test_zero_sales_never_divides() {
        let costs = CostStructure::default();
        let p = project_pl(0.0, 0.0, &costs);
        assert_eq!(p.net_margin, 0.0);
        assert!(!p.viable);
    }

    #[test]
    fn test_payback_zero_profit_is_infinite() {
        let p = payback(900_000.0, 0.0);
        assert!(p.months.is_infinite());
        assert_eq!(p.tier, PaybackTier::NotViable);
        assert!(!p.viable);
    }

    #[test]
    fn test_payback_negative_profit_is_infinite() {
        let p = payback(900_000.0, -50_000.0);
        assert!(p.months.is_infinite());
        assert!(!p.viable);
    }

    #[test]
    fn test_payback_tiers() {
        assert_eq!(payback(900_000.0, 90_000.0).tier, PaybackTier::Excellent); // 10 mo
        assert_eq!(payback(900_000.0, 60_000.0).tier, PaybackTier::Good); // 15 mo
        assert_eq!(payback(900_000.0, 40_000.0).tier, PaybackTier::Acceptable); // 22.5 mo
        assert_eq!(payback(900_000.0, 30_000.0).tier, PaybackTier::Risky); // 30 mo
        let slow = payback(900_000.0, 20_000.0); // 45 mo
        assert_eq!(slow.tier, PaybackTier::NotViable);
        assert!(!slow.viable);
    }

    #[test]
    fn test_payback_tier_boundaries() {
        assert_eq!(payback(1200.0, 100.0).tier, PaybackTier::Excellent); // exactly 12
        assert_eq!(payback(1800.0, 100.0).tier, PaybackTier::Good); // exactly 18
        assert_eq!(payback(2400.0, 100.0).tier, PaybackTier::Acceptable); // exactly 24
        assert_eq!(payback(3600.0, 100.0).tier, PaybackTier::Risky); // exactly 36
    }

    #[test]
    fn test_sales_from_score_buckets() {
        let business = BusinessParams::default();
        let target = business.target_monthly_revenue();
        assert_eq!(sales_from_score(90.0, &business), target * 1.15);
        assert_eq!(sales_from_score(70.0, &business), target * 1.0);
        assert_eq!(sales_from_score(50.0, &business), target * 0.75);
        assert_eq!(sales_from_score(10.0, &business), target * 0.35);
    }

    #[test]
    fn test_sales_from_score_monotonic() {
        let business = BusinessParams::default();
        let mut last = -1.0;
        for score in [0.0, 15.0, 31.0, 46.0, 61.0, 71.0, 86.0, 100.0] {
            let sales = sales_from_score(score, &business);
            assert!(sales >= last);
            last = sales;
        }
    }

    #[test]
    fn test_sales_from_traffic_exact_formula() {
        let traffic = TrafficEstimate {
            pax_per_hour: 500.0,
            conversion_rate: 0.02,
            operating_hours: 11.0,
        };
        let sales = sales_from_traffic(&traffic, 185.0);
        assert_eq!(sales, 500.0 * 0.02 * 11.0 * 185.0 * 30.0);
    }

    #[test]
    fn test_sales_from_traffic_reproducible() {
        let traffic = TrafficEstimate {
            pax_per_hour: 337.5,
            conversion_rate: 0.0175,
            operating_hours: 12.5,
        };
        let a = sales_from_traffic(&traffic, 149.9);
        let b = sales_from_traffic(&traffic, 149.9);
        assert_eq!(a.to_bits(), b.to_bits());
    }
}
