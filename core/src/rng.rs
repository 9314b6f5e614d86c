//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through DomainRng instances derived from
//! the single master seed the generator was built with.
//!
//! Each metrics domain gets its own RNG stream, seeded deterministically
//! from (master_seed XOR domain_index). This means:
//!   - Adding a new domain never changes existing domains' streams.
//!   - A fixed seed reproduces the full snapshot sequence, which is what
//!     golden-file tests rely on.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG for a single metrics domain.
pub struct DomainRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl DomainRng {
    /// Create a domain RNG from the master seed and a stable
    /// domain index. The index must never change once assigned.
    pub fn new(master_seed: u64, domain_index: u64) -> Self {
        let derived_seed = master_seed ^ (domain_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Uniform draw in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Symmetric bounded perturbation: a value in [base - variance, base + variance].
    pub fn vary(&mut self, base: f64, variance: f64) -> f64 {
        base + self.uniform(-variance, variance)
    }

    /// Pick one element uniformly.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.next_u64_below(items.len() as u64) as usize]
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// All domain RNGs for a single generator, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_domain(&self, slot: DomainSlot) -> DomainRng {
        DomainRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable domain slot assignments.
/// NEVER reorder or remove entries — only append.
/// Reordering changes every domain's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum DomainSlot {
    Kpis = 0,
    CreditRisk = 1,
    Liquidity = 2,
    Customer = 3,
    Fraud = 4,
    Collections = 5,
    Treasury = 6,
    Branch = 7,
    Compliance = 8,
    OpsRisk = 9,
    Growth = 10,
    Derived = 11,
    // Add new domains here — append only.
}

impl DomainSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Kpis => "kpis",
            Self::CreditRisk => "credit_risk",
            Self::Liquidity => "liquidity",
            Self::Customer => "customer",
            Self::Fraud => "fraud",
            Self::Collections => "collections",
            Self::Treasury => "treasury",
            Self::Branch => "branch",
            Self::Compliance => "compliance",
            Self::OpsRisk => "ops_risk",
            Self::Growth => "growth",
            Self::Derived => "derived",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = DomainRng::new(42, 3);
        let mut b = DomainRng::new(42, 3);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn domains_get_distinct_streams() {
        let bank = RngBank::new(7);
        let mut kpis = bank.for_domain(DomainSlot::Kpis);
        let mut fraud = bank.for_domain(DomainSlot::Fraud);
        let a: Vec<f64> = (0..8).map(|_| kpis.next_f64()).collect();
        let b: Vec<f64> = (0..8).map(|_| fraud.next_f64()).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn vary_stays_within_bounds() {
        let mut rng = DomainRng::new(1, 0);
        for _ in 0..1000 {
            let v = rng.vary(100.0, 5.0);
            assert!((95.0..=105.0).contains(&v));
        }
    }

    #[test]
    fn pick_covers_all_elements() {
        let mut rng = DomainRng::new(9, 0);
        let items = ["a", "b", "c"];
        let mut seen = [false; 3];
        for _ in 0..200 {
            let p = rng.pick(&items);
            seen[items.iter().position(|i| i == p).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
