use matrica::{Matrix, MatrixError};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

fn random_matrix(rng: &mut Xoshiro256StarStar, nrows: u32, ncols: u32) -> Matrix {
    let data = (0..nrows as usize * ncols as usize)
        .map(|_| rng.gen_range(-10.0..10.0))
        .collect();
    Matrix::from_linear(data, nrows, ncols).unwrap()
}

#[test]
fn addition_properties() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(11);

    for &(nrows, ncols) in &[(1, 1), (2, 3), (4, 4), (5, 2)] {
        let a = random_matrix(&mut rng, nrows, ncols);
        let b = random_matrix(&mut rng, nrows, ncols);

        // addition commutes entry-wise
        assert_eq!(&a + &b, &b + &a);

        // subtraction undoes addition within the comparison tolerance
        assert!(a.try_add(&b).unwrap().try_sub(&b).unwrap().approx_eq(&a));

        let zero = Matrix::new(nrows, ncols).unwrap();
        assert_eq!(a.try_add(&zero).unwrap(), a);
    }
}

#[test]
fn scaling_properties() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(12);

    let a = random_matrix(&mut rng, 3, 5);
    let b = random_matrix(&mut rng, 3, 5);

    // scaling distributes over addition
    let lhs = a.try_add(&b).unwrap().mul_scalar(2.5).unwrap();
    let rhs = a
        .mul_scalar(2.5)
        .unwrap()
        .try_add(&b.mul_scalar(2.5).unwrap())
        .unwrap();
    assert!(lhs.approx_eq(&rhs));

    // scaling by one is the identity, scaling by zero annihilates
    assert_eq!(a.mul_scalar(1.0).unwrap(), a);
    assert!(a.mul_scalar(0.0).unwrap().is_zero());
}

#[test]
fn transpose_properties() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(13);

    let a = random_matrix(&mut rng, 4, 2);
    let b = random_matrix(&mut rng, 4, 2);
    let c = random_matrix(&mut rng, 2, 3);

    // transposition is an involution
    assert_eq!(a.transpose().unwrap().transpose().unwrap(), a);

    // transposition distributes over addition
    let sum_t = a.try_add(&b).unwrap().transpose().unwrap();
    assert!(sum_t.approx_eq(
        &a.transpose()
            .unwrap()
            .try_add(&b.transpose().unwrap())
            .unwrap()
    ));

    // transposition reverses products
    let prod_t = a.try_mul(&c).unwrap().into_transposed();
    let reversed = c.transpose().unwrap().try_mul(&a.transpose().unwrap()).unwrap();
    assert!(prod_t.approx_eq(&reversed));
}

#[test]
fn product_properties() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(14);

    let a = random_matrix(&mut rng, 2, 4);
    let b = random_matrix(&mut rng, 4, 3);
    let c = random_matrix(&mut rng, 3, 5);

    // the product is associative within the comparison tolerance
    let left = a.try_mul(&b).unwrap().try_mul(&c).unwrap();
    let right = a.try_mul(&b.try_mul(&c).unwrap()).unwrap();
    assert!(left.approx_eq(&right));

    // the identity is neutral on either side
    assert!(Matrix::identity(2).unwrap().try_mul(&a).unwrap().approx_eq(&a));
    assert!(a.try_mul(&Matrix::identity(4).unwrap()).unwrap().approx_eq(&a));
}

#[test]
fn shape_rejections() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(15);

    let a = random_matrix(&mut rng, 2, 3);
    let b = random_matrix(&mut rng, 3, 2);

    assert_eq!(a.try_add(&b), Err(MatrixError::ShapeMismatch));
    assert_eq!(a.try_sub(&b), Err(MatrixError::ShapeMismatch));
    assert_eq!(a.try_mul(&a), Err(MatrixError::ShapeMismatch));
    assert!(a.try_mul(&b).is_ok());
}
