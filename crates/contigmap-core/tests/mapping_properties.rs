/// Property-based tests for the invariants every contig map must satisfy.
///
/// Contig strings are generated from small building blocks that always parse, so any
/// failure here is a mapping bug rather than a grammar rejection.
use contigmap::core::models::reference::PdbIndex;
use contigmap::core::models::residue::{ResidueRef, ResidueSpecifier};
use contigmap::engine::config::{ContigMapConfig, ContigMapConfigBuilder, LengthRange};
use contigmap::engine::expansion::ChainBreak;
use contigmap::workflows::map::{ContigMap, run};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn reference() -> PdbIndex {
    (1..=30)
        .map(|n| ResidueSpecifier::new('A', n))
        .chain((1..=20).map(|n| ResidueSpecifier::new('B', n)))
        .collect()
}

fn map_with(config: &ContigMapConfig, seed: u64) -> ContigMap {
    run(&reference(), config, &mut StdRng::seed_from_u64(seed)).unwrap()
}

fn generated() -> impl Strategy<Value = String> {
    (1usize..8, 0usize..5).prop_map(|(lo, extra)| format!("{lo}-{}", lo + extra))
}

fn motif() -> impl Strategy<Value = String> {
    (1isize..25, 0isize..5).prop_map(|(start, extra)| format!("A{start}-{}", start + extra))
}

/// An inpaint block always carries a generated stretch, so it is never read as a receptor.
fn inpaint_block() -> impl Strategy<Value = String> {
    (
        generated(),
        prop::collection::vec(prop_oneof![generated(), motif()], 0..3),
    )
        .prop_map(|(first, rest)| {
            let mut tokens = vec![first];
            tokens.extend(rest);
            tokens.join("/")
        })
}

/// Two ascending fragments of chain B with a real gap between them.
fn receptor_block() -> impl Strategy<Value = String> {
    (1isize..5, 0isize..4, 1isize..4, 0isize..4).prop_map(|(start, len1, gap, len2)| {
        let end1 = start + len1;
        let start2 = end1 + gap + 1;
        format!("B{start}-{end1}/B{start2}-{}/0", start2 + len2)
    })
}

fn contig() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(inpaint_block(), 1..4),
        prop::option::of(receptor_block()),
    )
        .prop_map(|(mut blocks, receptor)| {
            blocks.extend(receptor);
            blocks.join(" ")
        })
}

/// Property: every per-position array has the same length
/// and `mask_1d` is exactly "has a reference residue"
#[test]
fn prop_arrays_aligned_and_mask_1d_consistent() {
    proptest!(|(contigs in contig(), seed in any::<u64>())| {
        let config = ContigMapConfigBuilder::new().contigs(contigs.clone()).build().unwrap();
        let map = map_with(&config, seed);
        let m = &map.mapping;

        prop_assert_eq!(m.ref_idx.len(), m.hal_idx.len());
        prop_assert_eq!(m.ref_idx.len(), m.idx_rf.len());
        prop_assert_eq!(m.ref_idx.len(), m.mask_1d.len());
        prop_assert_eq!(m.ref_idx.len(), m.inpaint_seq.len());
        prop_assert_eq!(m.ref_idx.len(), m.inpaint_str.len());

        for (r, &known) in m.ref_idx.iter().zip(&m.mask_1d) {
            prop_assert_eq!(known, !r.is_gap(), "mask_1d disagrees with {} in {}", r, contigs);
        }
    });
}

/// Property: linear indices strictly increase across chains and regions
#[test]
fn prop_linear_index_strictly_increasing() {
    proptest!(|(contigs in contig(), seed in any::<u64>())| {
        let config = ContigMapConfigBuilder::new().contigs(contigs.clone()).build().unwrap();
        let map = map_with(&config, seed);
        for pair in map.mapping.idx_rf.windows(2) {
            prop_assert!(pair[0] < pair[1], "idx_rf not increasing for {}: {:?}", contigs, map.mapping.idx_rf);
        }
    });
}

/// Property: generated chains are labelled A, B, ... and the receptor takes the next label
#[test]
fn prop_chain_labels_follow_alphabet() {
    proptest!(|(contigs in contig(), seed in any::<u64>())| {
        let config = ContigMapConfigBuilder::new().contigs(contigs).build().unwrap();
        let map = map_with(&config, seed);

        let mut labels: Vec<char> = map.inpaint.hal_idx.iter().map(|h| h.chain_id).collect();
        labels.dedup();
        let expected: Vec<char> = ('A'..='Z').take(map.inpaint_chains).collect();
        prop_assert_eq!(labels, expected);

        if !map.receptor.is_empty() {
            let receptor_label = char::from(b'A' + map.inpaint_chains as u8);
            prop_assert_eq!(map.receptor_chain, Some(receptor_label));
            prop_assert!(map.receptor.hal_idx.iter().all(|h| h.chain_id == receptor_label));
        }
    });
}

/// Property: an explicit mapping is reproduced exactly
#[test]
fn prop_precise_mapping_round_trips() {
    proptest!(|(entries in prop::collection::vec(prop::option::of(1isize..=30), 1..40))| {
        let ref_idx: Vec<ResidueRef> = entries
            .iter()
            .map(|e| e.map_or(ResidueRef::Gap, |n| ResidueRef::new('A', n)))
            .collect();
        let hal_idx: Vec<ResidueSpecifier> = (1..=entries.len() as isize)
            .map(|n| ResidueSpecifier::new('A', n))
            .collect();
        let idx_rf: Vec<usize> = (0..entries.len()).collect();

        let config = ContigMapConfigBuilder::new()
            .ref_idx(ref_idx.clone())
            .hal_idx(hal_idx.clone())
            .idx_rf(idx_rf.clone())
            .build()
            .unwrap();
        let map = map_with(&config, 0);

        prop_assert_eq!(&map.mapping.ref_idx, &ref_idx);
        prop_assert_eq!(&map.mapping.hal_idx, &hal_idx);
        prop_assert_eq!(&map.mapping.idx_rf, &idx_rf);
    });
}

#[test]
fn length_window_is_always_met() {
    let config = ContigMapConfigBuilder::new()
        .contigs("5-10")
        .length("7-8".parse::<LengthRange>().unwrap())
        .build()
        .unwrap();
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..1000 {
        let map = run(&reference(), &config, &mut rng).unwrap();
        assert!(map.len() == 7 || map.len() == 8, "sampled length {}", map.len());
    }
}

#[test]
fn matched_symmetric_chains_have_equal_length() {
    let config = ContigMapConfigBuilder::new()
        .contigs("A1-5/10 A1-5/10")
        .symmetry_order(2)
        .build()
        .unwrap();
    let map = map_with(&config, 3);

    assert_eq!(map.inpaint_chains, 2);
    let chain_a = map.inpaint.hal_idx.iter().filter(|h| h.chain_id == 'A').count();
    let chain_b = map.inpaint.hal_idx.iter().filter(|h| h.chain_id == 'B').count();
    assert_eq!(chain_a, chain_b);
    assert_eq!(map.len() % 2, 0);
}

#[test]
fn single_chain_is_replicated_by_symmetry_order() {
    let config = ContigMapConfigBuilder::new()
        .contigs("A1-5/10")
        .symmetry_order(3)
        .build()
        .unwrap();
    let map = map_with(&config, 4);

    assert_eq!(map.inpaint_chains, 3);
    assert_eq!(map.len(), 45);
    assert_eq!(map.sampled_mask, vec!["A1-5/10-10"; 3]);
}

#[test]
fn fragmented_receptor_records_reference_gap() {
    let config = ContigMapConfigBuilder::new()
        .contigs("A1-5/A10-15/0")
        .build()
        .unwrap();
    let map = map_with(&config, 5);

    assert_eq!(
        map.receptor.chain_breaks,
        vec![
            ChainBreak {
                position: 5,
                jump: 4
            },
            ChainBreak {
                position: 11,
                jump: 200
            }
        ]
    );
}

#[test]
fn provide_seq_marks_leading_positions_known() {
    let config = ContigMapConfigBuilder::new()
        .contigs("6-6")
        .provide_seq("0-2".parse().unwrap())
        .build()
        .unwrap();
    let map = map_with(&config, 6);
    assert_eq!(
        map.mapping.inpaint_seq,
        vec![true, true, true, false, false, false]
    );
}

#[test]
fn mappings_serialize_receptor_projections_only_when_present() {
    let config = ContigMapConfigBuilder::new()
        .contigs("4-4 B1-3")
        .build()
        .unwrap();
    let with_receptor = map_with(&config, 7).mappings();
    assert!(with_receptor.has_receptor());

    let config = ContigMapConfigBuilder::new().contigs("A1-3/4-4").build().unwrap();
    let without_receptor = map_with(&config, 7).mappings();
    assert!(!without_receptor.has_receptor());
    assert_eq!(without_receptor.con_ref_idx0, vec![0, 1, 2]);
    assert_eq!(without_receptor.con_hal_idx0, vec![0, 1, 2]);
}
