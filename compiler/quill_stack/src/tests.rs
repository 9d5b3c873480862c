use super::*;

#[test]
fn nested_list_depth_survives() {
    fn depth(levels: u64) -> u64 {
        ensure_sufficient_stack(|| if levels == 0 { 0 } else { depth(levels - 1) + 1 })
    }

    // Deep enough to overflow a default 8MB thread stack without growth
    assert_eq!(depth(100_000), 100_000);
}

#[test]
fn passes_through_result() {
    let result: Result<u8, &str> = ensure_sufficient_stack(|| Err("null reference"));
    assert_eq!(result, Err("null reference"));
}
