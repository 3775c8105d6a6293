use ndtensor::{ErrorKind, Tensor, Tensor0, Tensor3, TensorError};

struct Fixture {
    a: Tensor<f64>,
    b: Tensor<f64>,
    c: Tensor<f32>,
    d: Tensor0<f64>,
    e: Tensor3<f64>,
    f: Tensor3<u8>,
}

fn fixture() -> Fixture {
    Fixture {
        a: Tensor::from_shape_val(&[2, 3, 5, 7], 1.0),
        b: Tensor::from_shape_val(&[2, 3, 5, 8], 1.0),
        c: Tensor::from_shape_val(&[6, 35], 2.0),
        d: Tensor0::from_shape_val([], 0.0),
        e: Tensor3::from_shape_val([3, 5, 7], 0.0),
        f: Tensor3::from_shape_val([3, 5, 7], 4),
    }
}

#[test]
fn indexing() {
    let Fixture { a, .. } = fixture();

    assert!(a.slice(&[1, 2]).is_ok());
    assert_eq!(
        a.slice(&[0, 0, 0, 0, 0]).unwrap_err().kind(),
        ErrorKind::ShapeMismatch
    );
    assert_eq!(
        a.slice(&[0, 0, 0, 9, 9]).unwrap_err().kind(),
        ErrorKind::ShapeMismatch
    );
    assert_eq!(
        a.slice(&[1, 2, 4, 7]).unwrap_err().kind(),
        ErrorKind::OutOfRange
    );
}

#[test]
fn arithmetic_needs_equal_counts() -> Result<(), TensorError> {
    let Fixture { mut a, b, c, .. } = fixture();

    assert_eq!(a.add_inplace(&b).unwrap_err().kind(), ErrorKind::ShapeMismatch);
    a.add_inplace(&c)?;
    assert_eq!(a.shape(), &[2, 3, 5, 7]);
    assert!(a.iter().all(|&x| x == 3.0));
    Ok(())
}

#[test]
fn rank_rules() -> Result<(), TensorError> {
    let Fixture {
        mut a,
        mut e,
        f,
        ..
    } = fixture();

    let err = e.assign_from(&a).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RankMismatch);

    e.assign_from(f.as_tensor())?;
    assert!(e.iter().all(|&x| x == 4.0));

    a.assign_from(e.as_tensor());
    assert_eq!(a.rank(), 3);

    assert_eq!(
        e.alloc(&[2, 3, 5, 7], 0.0).unwrap_err().kind(),
        ErrorKind::RankMismatch
    );
    Ok(())
}

#[test]
fn scalars_cannot_be_sliced() {
    let Fixture { d, .. } = fixture();
    assert_eq!(d.at(0).unwrap_err().kind(), ErrorKind::ShapeMismatch);
}

#[test]
fn sub_tensor_assignment() -> Result<(), TensorError> {
    let Fixture { mut a, b, c, .. } = fixture();

    assert_eq!(
        a.assign(&b, &[1, 2], &[1, 2]).unwrap_err().kind(),
        ErrorKind::ShapeMismatch
    );
    a.assign(&c, &[1, 2], &[0])?;
    assert_eq!(
        a.assign(&c, &[1, 3], &[0]).unwrap_err().kind(),
        ErrorKind::OutOfRange
    );
    Ok(())
}

#[test]
fn transpose_rules() -> Result<(), TensorError> {
    let Fixture { f, .. } = fixture();

    let g = f.transpose([0, 2, 1])?;
    assert_eq!(g.shape(), &[3, 7, 5]);
    assert_eq!(
        f.transpose([1, 3, 2]).unwrap_err().kind(),
        ErrorKind::ShapeMismatch
    );
    Ok(())
}

#[test]
fn contraction_rules() {
    let Fixture { a, .. } = fixture();

    assert_eq!(
        a.dot(&a, &[1, 2, 3], &[1, 2, 3, 4]).unwrap_err().kind(),
        ErrorKind::ShapeMismatch
    );
    assert_eq!(
        a.dot_with_offsets(&a, &[1, 2, 3, 4], &[5, 6, 7, 8], &[0, 0, 0, 7])
            .unwrap_err()
            .kind(),
        ErrorKind::OutOfRange
    );
}

#[test]
fn only_file_errors_are_recoverable() {
    let err = Tensor::<f64>::read("does/not/exist.f64").unwrap_err();
    assert!(!err.is_programming_error());

    let Fixture { a, .. } = fixture();
    let err = a.slice(&[0, 0, 0, 0, 0]).unwrap_err();
    assert!(err.is_programming_error());
}
