use crate::models::{BalanceRecord, EnrichedBalance};

use super::{NormalizeError, Normalizer, PriceTable, PriorityTable};

struct Cached {
    records: Vec<BalanceRecord>,
    prices: PriceTable,
    priorities: PriorityTable,
    output: Vec<EnrichedBalance>,
}

/// Caller-side cache for [`Normalizer`] output.
///
/// Recomputes whenever any of the three inputs differs from the previous
/// call and otherwise hands back the previous result. Failed calls are not
/// cached.
#[derive(Default)]
pub struct MemoizedNormalizer {
    normalizer: Normalizer,
    cached: Option<Cached>,
    recomputations: u64,
}

impl MemoizedNormalizer {
    pub fn new(normalizer: Normalizer) -> Self {
        Self {
            normalizer,
            cached: None,
            recomputations: 0,
        }
    }

    pub fn get_or_compute(
        &mut self,
        records: &[BalanceRecord],
        prices: &PriceTable,
        priorities: &PriorityTable,
    ) -> Result<&[EnrichedBalance], NormalizeError> {
        let fresh = matches!(
            &self.cached,
            Some(c) if c.records == records && &c.prices == prices && &c.priorities == priorities
        );

        if !fresh {
            let output = self.normalizer.normalize(records, prices, priorities)?;
            self.recomputations += 1;
            self.cached = Some(Cached {
                records: records.to_vec(),
                prices: prices.clone(),
                priorities: priorities.clone(),
                output,
            });
        }

        Ok(self
            .cached
            .as_ref()
            .map(|c| c.output.as_slice())
            .unwrap_or_default())
    }

    /// How many times the wrapped normalizer actually ran.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn records() -> Vec<BalanceRecord> {
        vec![
            BalanceRecord::new("SWTH", "10", "Ethereum"),
            BalanceRecord::new("ATOM", "2", "Osmosis"),
        ]
    }

    #[test]
    fn reuses_output_for_identical_inputs() {
        let mut memo = MemoizedNormalizer::default();
        let prices = PriceTable::new();
        let priorities = PriorityTable::reference();

        let first = memo.get_or_compute(&records(), &prices, &priorities).unwrap().to_vec();
        let second = memo.get_or_compute(&records(), &prices, &priorities).unwrap().to_vec();

        assert_eq!(first, second);
        assert_eq!(memo.recomputations(), 1);
    }

    #[test]
    fn recomputes_when_any_input_changes() {
        let mut memo = MemoizedNormalizer::default();
        let mut prices = PriceTable::new();
        let mut priorities = PriorityTable::reference();

        memo.get_or_compute(&records(), &prices, &priorities).unwrap();

        prices.try_insert("SWTH", Decimal::new(1, 1)).unwrap();
        let out = memo.get_or_compute(&records(), &prices, &priorities).unwrap();
        assert_eq!(out[1].usd_value, Decimal::ONE);
        assert_eq!(memo.recomputations(), 2);

        priorities.insert("Ethereum", 500);
        let out = memo.get_or_compute(&records(), &prices, &priorities).unwrap();
        assert_eq!(out[0].chain, "Ethereum");
        assert_eq!(memo.recomputations(), 3);

        let mut changed = records();
        changed.pop();
        let out = memo.get_or_compute(&changed, &prices, &priorities).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(memo.recomputations(), 4);
    }

    #[test]
    fn errors_are_not_cached() {
        let mut memo = MemoizedNormalizer::default();
        let bad = vec![BalanceRecord::new("SWTH", "??", "Ethereum")];
        let prices = PriceTable::new();
        let priorities = PriorityTable::reference();

        assert!(memo.get_or_compute(&bad, &prices, &priorities).is_err());
        assert!(memo.get_or_compute(&bad, &prices, &priorities).is_err());
        assert_eq!(memo.recomputations(), 0);

        memo.get_or_compute(&records(), &prices, &priorities).unwrap();
        memo.invalidate();
        memo.get_or_compute(&records(), &prices, &priorities).unwrap();
        assert_eq!(memo.recomputations(), 2);
    }
}
