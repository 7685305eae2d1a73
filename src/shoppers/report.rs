//! Console rendering of query results.

use super::analysis::TopOffer;
use std::fmt;

/// Everything one driver run computes.
#[derive(Clone, Debug, PartialEq)]
pub struct ShoppersReport {
    pub top_offers: Vec<TopOffer>,
    pub offer_value: f64,
    pub max_repeattrips: Option<u64>,
    /// Best repeat-trip count per offer value, by ascending value.
    pub repeattrips_by_offer_value: Vec<(f64, u64)>,
    pub avg_spend_per_trip: Vec<(String, f64)>,
    pub avg_spend_in_offer_category: Vec<(String, f64)>,
}

impl fmt::Display for TopOffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Customer #{} saved {:?} dollars on offer #{} and later made repeated purchases {} times",
            self.customer_id, self.offervalue, self.offer_id, self.repeattrips
        )
    }
}

impl fmt::Display for ShoppersReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for offer in &self.top_offers {
            writeln!(f, "{offer}")?;
        }
        writeln!(f)?;
        match self.max_repeattrips {
            Some(n) => writeln!(
                f,
                "Coupons with {:?} dollar value yield a maximum of only {n} repeated purchases",
                self.offer_value
            )?,
            None => writeln!(f, "No coupon has a {:?} dollar value", self.offer_value)?,
        }
        for (value, trips) in &self.repeattrips_by_offer_value {
            writeln!(f, "  {value:?} dollar coupons: at most {trips} repeated purchases")?;
        }
        writeln!(f)?;
        writeln!(f, "Average spending per trip:")?;
        for (customer, avg) in &self.avg_spend_per_trip {
            writeln!(f, "Customer #{customer} : {avg:.2}")?;
        }
        writeln!(f)?;
        write!(f, "Average spending per trip in offered categories:")?;
        for (customer, avg) in &self.avg_spend_in_offer_category {
            write!(f, "\nCustomer #{customer} : {avg:.2}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> TopOffer {
        TopOffer {
            customer_id: "3465135195".into(),
            offer_id: "1197502".into(),
            repeattrips: 2124,
            offervalue: 0.75,
        }
    }

    #[test]
    fn top_offer_line() {
        assert_eq!(
            offer().to_string(),
            "Customer #3465135195 saved 0.75 dollars on offer #1197502 and later made repeated purchases 2124 times"
        );
    }

    #[test]
    fn whole_dollar_values_keep_a_decimal() {
        let o = TopOffer {
            offervalue: 1.0,
            ..offer()
        };
        assert!(o.to_string().contains("saved 1.0 dollars"));
    }

    #[test]
    fn report_sections() {
        let report = ShoppersReport {
            top_offers: vec![offer()],
            offer_value: 3.0,
            max_repeattrips: None,
            repeattrips_by_offer_value: vec![(0.75, 2124), (2.0, 7)],
            avg_spend_per_trip: vec![("A".into(), 9.0)],
            avg_spend_in_offer_category: vec![],
        };
        let text = report.to_string();
        assert!(text.contains("No coupon has a 3.0 dollar value"));
        assert!(text.contains("  0.75 dollar coupons: at most 2124 repeated purchases\n  2.0 dollar coupons: at most 7"));
        assert!(text.contains("Customer #A : 9.00"));
        assert!(text.ends_with("in offered categories:"));
    }
}
