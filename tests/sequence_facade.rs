use feistel_perm::{
    sample, sample_indices, shuffle, OffendingIndex, Permutation, PermutationError,
    PermutedSequence,
};

#[test]
fn negative_indices_wrap_from_the_end() {
    let sequence = PermutedSequence::new(10, 42).unwrap();
    assert_eq!(sequence.get_one(-1), sequence.forward(9));
    assert_eq!(sequence.get_one(-10), sequence.forward(0));
    assert_eq!(
        sequence.get_one(-11),
        Err(PermutationError::IndexOutOfRange {
            index: OffendingIndex::Signed(-11),
            len: 10
        })
    );
    assert!(sequence.get_one(10).is_err());
}

#[test]
fn negative_values_are_out_of_range_for_backward() {
    let sequence = PermutedSequence::new(5, 42).unwrap();
    assert_eq!(
        sequence.backward(-1),
        Err(PermutationError::IndexOutOfRange {
            index: OffendingIndex::Signed(-1),
            len: 5
        })
    );
    assert!(sequence.backward(5).is_err());
    for value in 0..5 {
        let index = sequence.backward(value).unwrap();
        assert_eq!(sequence.forward(index), Ok(value as u128));
    }
}

#[test]
fn slices_expand_to_forward_lookups() {
    let sequence = PermutedSequence::new(20, 3).unwrap();
    let all: Vec<u128> = sequence.iter().map(Result::unwrap).collect();

    assert_eq!(sequence.get_range(None, None, 1).unwrap(), all);
    assert_eq!(sequence.get_range(Some(2), Some(8), 3).unwrap(), vec![all[2], all[5]]);
    assert_eq!(sequence.get_range(Some(-3), None, 1).unwrap(), all[17..].to_vec());

    let reversed: Vec<u128> = all.iter().rev().copied().collect();
    assert_eq!(sequence.get_range(None, None, -1).unwrap(), reversed);
    assert!(sequence.get_range(Some(5), Some(5), 1).unwrap().is_empty());
    assert_eq!(
        sequence.get_range(None, None, 0).unwrap_err(),
        PermutationError::ZeroSliceStep
    );
}

#[test]
fn random_seed_is_recorded_for_replay() {
    let sequence = PermutedSequence::with_random_seed(1_000).unwrap();
    let replay = PermutedSequence::new(1_000, sequence.seed()).unwrap();
    for i in [0i128, 1, 500, -1] {
        assert_eq!(sequence.get_one(i), replay.get_one(i));
    }
}

#[test]
fn wraps_an_existing_engine() {
    let permutation = Permutation::new(8, 5).unwrap();
    let sequence = PermutedSequence::from_permutation(permutation.clone());
    assert_eq!(sequence.len(), 8);
    assert!(!sequence.is_empty());
    assert_eq!(sequence.get_one(3), permutation.forward(3));
}

#[test]
fn sampled_indices_are_distinct_prefixes() {
    let indices = sample_indices(100, 10, 42).unwrap();
    assert_eq!(indices.len(), 10);
    let sequence = PermutedSequence::new(100, 42).unwrap();
    assert_eq!(indices, sequence.get_range(None, Some(10), 1).unwrap());

    let mut sorted = indices.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(sorted.len(), 10);

    assert_eq!(
        sample_indices(3, 4, 0).unwrap_err(),
        PermutationError::SampleTooLarge { requested: 4, len: 3 }
    );
}

#[test]
fn sample_and_shuffle_preserve_elements() {
    let data: Vec<i32> = (0..50).collect();
    let picked = sample(&data, 7, 9).unwrap();
    assert_eq!(picked.len(), 7);
    assert!(picked.iter().all(|item| data.contains(item)));

    let shuffled = shuffle(&data, 9).unwrap();
    assert_ne!(shuffled, data);
    let mut sorted = shuffled.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, data);

    assert_eq!(shuffle::<i32>(&[], 9).unwrap(), Vec::<i32>::new());
}
