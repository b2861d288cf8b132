//! Discounted-return estimation.
//!
//! Converts a trajectory's immediate rewards into per-step discounted
//! returns by backward accumulation:
//!
//!   return[t] = reward[t] + gamma * return[t+1]
//!
//! with the recurrence seeded by a bootstrap value: 0 when the episode
//! reached a terminal state, or a value-network estimate when the rollout
//! was cut off at its step budget.

/// Compute discounted returns for a reward sequence.
///
/// Pure function: identical inputs always produce identical outputs, and
/// `returns.len() == rewards.len()`. Accumulation is plain floating point
/// with no clamping; rewards are bounded and `gamma < 1`, so the returns
/// stay bounded in practice.
pub fn discount_rewards(rewards: &[f32], gamma: f32, bootstrap: f32) -> Vec<f32> {
    let mut returns = vec![0.0; rewards.len()];
    let mut running = bootstrap;
    for t in (0..rewards.len()).rev() {
        running = rewards[t] + gamma * running;
        returns[t] = running;
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backward_recurrence_matches_the_closed_form() {
        // rewards = [1, 1, 1], gamma = 0.5, bootstrap = 0:
        //   returns[2] = 1.0
        //   returns[1] = 1 + 0.5 * 1.0  = 1.5
        //   returns[0] = 1 + 0.5 * 1.5  = 1.75
        let returns = discount_rewards(&[1.0, 1.0, 1.0], 0.5, 0.0);
        assert_eq!(returns.len(), 3);
        assert!((returns[0] - 1.75).abs() < 1e-6);
        assert!((returns[1] - 1.5).abs() < 1e-6);
        assert!((returns[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn bootstrap_seeds_the_final_step() {
        // returns[T-1] = r[T-1] + gamma * bootstrap
        let returns = discount_rewards(&[1.0, 1.0], 0.9, 10.0);
        assert!((returns[1] - (1.0 + 0.9 * 10.0)).abs() < 1e-6);
        assert!((returns[0] - (1.0 + 0.9 * returns[1])).abs() < 1e-6);
    }

    #[test]
    fn zero_gamma_returns_the_raw_rewards() {
        let rewards = [0.5, -1.0, 2.0];
        let returns = discount_rewards(&rewards, 0.0, 100.0);
        for (ret, reward) in returns.iter().zip(rewards.iter()) {
            assert!((ret - reward).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_rewards_produce_empty_returns() {
        assert!(discount_rewards(&[], 0.99, 5.0).is_empty());
    }

    #[test]
    fn identical_inputs_produce_identical_outputs() {
        let rewards = vec![1.0, 0.0, -2.0, 3.5];
        let first = discount_rewards(&rewards, 0.99, 1.25);
        let second = discount_rewards(&rewards, 0.99, 1.25);
        assert_eq!(first, second);
    }

    #[test]
    fn general_recurrence_holds_for_every_step() {
        let rewards = vec![0.3, -0.7, 1.2, 0.0, 2.5];
        let gamma = 0.99;
        let bootstrap = 4.2;
        let returns = discount_rewards(&rewards, gamma, bootstrap);

        assert!((returns[4] - (rewards[4] + gamma * bootstrap)).abs() < 1e-5);
        for t in 0..rewards.len() - 1 {
            assert!(
                (returns[t] - (rewards[t] + gamma * returns[t + 1])).abs() < 1e-5,
                "recurrence violated at step {t}"
            );
        }
    }
}
