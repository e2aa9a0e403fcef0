use mlhelpers::{ArrayView, MlHelpersError, OwnedArray};

fn sequential(shape: &[usize]) -> OwnedArray<f64> {
    let count: usize = shape.iter().product();
    OwnedArray::from_vec((0..count).map(|i| i as f64).collect(), shape).unwrap()
}

#[test]
fn reshape_to_same_shape_keeps_contents() {
    let mut array = sequential(&[3, 4, 2]);
    let view = array.view();
    let same = view.reshaped(&[3, 4, 2]).unwrap();
    for a in 0..3 {
        for b in 0..4 {
            for c in 0..2 {
                assert_eq!(same.get((a, b, c)), view.get((a, b, c)));
            }
        }
    }
}

#[test]
fn transpose_swaps_indices() {
    let mut data: Vec<f32> = (0..6).map(|i| i as f32).collect();
    let view = ArrayView::wrap_contiguous(&mut data, &[2, 3]).unwrap();
    let t = view.transposed(&[1, 0]).unwrap();
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.strides(), &[1, 3]);
    for i in 0..3 {
        for j in 0..2 {
            assert_eq!(t.get((i, j)), view.get((j, i)));
        }
    }
}

#[test]
fn reshape_with_different_count_fails_without_mutation() {
    let mut array = sequential(&[3, 4, 2]);
    let view = array.view();
    let before = view.to_vec();

    let err = view.reshaped(&[5, 5]).err().unwrap();
    assert_eq!(
        err,
        MlHelpersError::ShapeMismatch {
            from: vec![3, 4, 2],
            to: vec![5, 5],
        }
    );
    assert_eq!(view.shape(), &[3, 4, 2]);
    assert_eq!(view.strides(), &[8, 2, 1]);
    assert_eq!(view.to_vec(), before);
}

#[test]
fn writes_through_one_alias_are_visible_in_others() {
    let mut array = OwnedArray::<f32>::zeros(&[3, 4, 2]).unwrap();
    let view = array.view();
    let transposed = view.transposed(&[1, 2, 0]).unwrap();
    let reshaped = view.reshaped(&[8, 3]).unwrap();

    transposed.set((2, 1, 0), 3.5);
    assert_eq!(view.get((0, 2, 1)), 3.5);
    assert_eq!(reshaped.get_flat(5), 3.5);

    reshaped.set((7, 2), -1.0);
    assert_eq!(view.get((2, 3, 1)), -1.0);
    drop(transposed);
    drop(reshaped);
    drop(view);
    assert_eq!(array.as_slice()[23], -1.0);
}

#[test]
fn wrapped_buffer_is_not_copied() {
    let mut data = vec![0i32; 24];
    {
        let view = ArrayView::wrap_contiguous(&mut data, &[3, 4, 2]).unwrap();
        view.set((1, 2, 0), 314);
        assert_eq!(view.get((1, 2, 0)), 314);
        view.set([1, 2, 0], 271);
        assert_eq!(view.get([1, 2, 0]), 271);
    }
    assert_eq!(data[12], 271);
}

#[test]
fn every_index_form_reads_the_same_element() {
    let mut array = sequential(&[2, 3, 4, 5, 6]);
    let view = array.view();
    let idx = [1usize, 2, 3, 4, 5];
    let expected = view.get(idx);
    assert_eq!(view.get((1, 2, 3, 4, 5)), expected);
    assert_eq!(view.get(&idx[..]), expected);
    assert_eq!(view.try_get((1, 2, 3, 4, 5)), Some(expected));

    let flat = view.reshaped(&[720]).unwrap();
    assert_eq!(flat.get(719), 719.0);
    let grid = view.reshaped(&[24, 30]).unwrap();
    assert_eq!(grid.get((23, 29)), 719.0);
    let cube = view.reshaped(&[6, 10, 12]).unwrap();
    assert_eq!(cube.get((5, 9, 11)), 719.0);
    let four = view.reshaped(&[6, 10, 3, 4]).unwrap();
    assert_eq!(four.get((5, 9, 2, 3)), 719.0);
}

#[test]
fn try_get_rejects_out_of_range_and_wrong_rank() {
    let mut array = sequential(&[2, 3]);
    let view = array.view();
    assert_eq!(view.try_get((1, 2)), Some(5.0));
    assert_eq!(view.try_get((2, 0)), None);
    assert_eq!(view.try_get((0, 3)), None);
    assert_eq!(view.try_get(1), None);
    assert_eq!(view.try_get([0usize, 0, 0].as_slice()), None);
}

#[test]
fn custom_strides_address_a_padded_buffer() {
    // 2x3 image stored with a row pitch of 4 elements.
    let mut data = vec![1, 2, 3, -9, 4, 5, 6, -9];
    let view = ArrayView::wrap(&mut data, &[2, 3], &[4, 1]).unwrap();
    assert_eq!(view.get((1, 0)), 4);
    assert_eq!(view.to_vec(), vec![1, 2, 3, 4, 5, 6]);

    let compact = view.to_owned();
    assert_eq!(compact.shape(), &[2, 3]);
    assert_eq!(compact.as_slice(), &[1, 2, 3, 4, 5, 6]);
}

#[test]
fn reshape_after_transpose_uses_storage_order() {
    let mut array = sequential(&[2, 3]);
    let view = array.view();
    let t = view.transposed(&[1, 0]).unwrap();
    assert!(!t.is_contiguous());

    // Storage order, not the transposed logical order.
    let r = t.reshaped(&[6]).unwrap();
    assert_eq!(r.to_vec(), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

    let mut materialized = t.to_owned();
    let logical = materialized.view().reshaped(&[6]).unwrap().to_vec();
    assert_eq!(logical, vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
}

#[test]
fn filled_array_describes_nested_rows() {
    let mut array = OwnedArray::filled(&[2, 2, 2], 1i32).unwrap();
    let view = array.view();
    assert_eq!(
        view.to_string(),
        "[[[ 1, 1 ],\n  [ 1, 1 ]],\n [[ 1, 1 ],\n  [ 1, 1 ]]]"
    );
}

#[test]
fn five_dim_transpose_and_reshape_match_fixture() {
    let mut array = sequential(&[1, 1, 48, 17, 27]);
    let a = array.view();
    assert_eq!(a.strides(), &[22032, 22032, 459, 27, 1]);
    for j in 0..2 {
        for i in 0..27 {
            assert_eq!(a.get((0, 0, 0, j, i)), (j * 27 + i) as f64);
        }
    }

    let b = a.transposed(&[0, 1, 3, 4, 2]).unwrap();
    assert_eq!(b.shape(), &[1, 1, 17, 27, 48]);
    assert_eq!(b.strides(), &[22032, 22032, 27, 1, 459]);
    for j in 0..2 {
        for i in 0..48 {
            assert_eq!(b.get((0, 0, 0, j, i)), (j + 459 * i) as f64);
        }
    }
    for i in 0..48 {
        assert_eq!(b.get((0, 0, 0, 26, i)), (26 + 459 * i) as f64);
    }

    // Reshaping the transposed view directly would follow storage order, so
    // materialize the logical order first.
    let mut contiguous = b.to_owned();
    let c = contiguous.view().reshaped(&[5508, 4]).unwrap();
    assert_eq!(c.shape(), &[5508, 4]);
    assert_eq!(c.strides(), &[4, 1]);
    let expected_c = [[0.0, 459.0, 918.0, 1377.0], [1836.0, 2295.0, 2754.0, 3213.0]];
    for (j, row) in expected_c.iter().enumerate() {
        for (i, &value) in row.iter().enumerate() {
            assert_eq!(c.get((j, i)), value);
        }
    }
    let expected_end = [20654.0, 21113.0, 21572.0, 22031.0];
    for (i, &value) in expected_end.iter().enumerate() {
        assert_eq!(c.get((5507, i)), value);
    }
}
