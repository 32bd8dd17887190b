use proptest::prelude::*;

#[allow(dead_code)]
pub(super) fn assert_eq_iters<I: Iterator, J: Iterator<Item = I::Item>>(
    mut i: I,
    mut j: J,
) where
    I::Item: std::fmt::Debug + Eq, // same inferred for J::Item
{
    loop {
        match (i.next(), j.next()) {
            (None, None) => return,
            (a, b) => assert_eq!(a, b),
        }
    }
}

pub(super) type SmallIntPairs = Vec<(u16, u16)>;

#[allow(dead_code)]
pub(super) fn small_int_pairs() -> impl Strategy<Value = SmallIntPairs> {
    prop::collection::vec((0u16..1024u16, 0u16..1024u16), 0..512)
}

#[allow(dead_code)]
pub(super) fn string_u16_pairs() -> impl Strategy<Value = Vec<(String, u16)>> {
    prop::collection::vec(("[a-z]{0,2}", 0u16..1024u16), 0..512)
}

/// One step of a randomized session against a map.
#[allow(dead_code)]
#[derive(Clone, Debug)]
pub(super) enum Op {
    Get(u16),
    Set(u16, u16),
    Delete(u16),
}

// Keys come from a narrow range so that updates and deletes of present keys
// are common.
#[allow(dead_code)]
pub(super) fn ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        1 => (0u16..256).prop_map(Op::Get),
        3 => (0u16..256, any::<u16>()).prop_map(|(k, v)| Op::Set(k, v)),
        2 => (0u16..256).prop_map(Op::Delete),
    ];
    prop::collection::vec(op, 0..max_len)
}
