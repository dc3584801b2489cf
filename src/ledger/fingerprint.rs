//! Content fingerprint of a ledger's settlement instructions.

use super::Ledger;
use sha2::{Digest, Sha256};

fn hash_var(hasher: &mut Sha256, data: &str) {
    hasher.update((data.len() as u32).to_le_bytes());
    hasher.update(data.as_bytes());
}

impl Ledger {
    /// SHA-256 over the ordered `(from, to, amount, origin)` tuples.
    ///
    /// Ids, paid flags and creation times are excluded, so two builds from
    /// the same inputs share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.len() as u64).to_le_bytes());
        for transfer in self.iter() {
            let (from, to, amount, origin) = transfer.settlement_key();
            hash_var(&mut hasher, from.as_str());
            hash_var(&mut hasher, to.as_str());
            hash_var(&mut hasher, &amount.to_canonical_string());
            hash_var(&mut hasher, &origin.to_string());
        }
        hex::encode(hasher.finalize())
    }
}
