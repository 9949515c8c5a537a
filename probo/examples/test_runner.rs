//! A minimal test binary using link-time registration.
//!
//! ```text
//! cargo run --example test_runner -- --list
//! cargo run --example test_runner -- --all
//! cargo run --example test_runner -- :reverse
//! ```

use probo::prelude::*;

probo_test! {
    fn test_sorting() {
        let mut values = vec![3, 1, 2];
        values.sort();
        assert_eq!(values, vec![1, 2, 3]);
    }
}

probo_test! {
    fn test_reverse() {
        let mut values = vec![1, 2, 3];
        values.reverse();
        assert_eq!(values, vec![3, 2, 1]);
    }
}

fn test_expensive() {
    std::thread::sleep(std::time::Duration::from_millis(50));
}
probo_test!(skip test_expensive);

fn main() -> anyhow::Result<()> {
    run_tests()
}
