#[macro_export]
macro_rules! assert_amplitudes {
    ($state:expr, [$(($re:expr, $im:expr)),* $(,)?], $level:expr) => {{
        let state = &$state;
        let expected: Vec<num_complex::Complex<i64>> =
            vec![$(num_complex::Complex::new($re, $im)),*];
        let actual = state.vector().iter().cloned().collect::<Vec<_>>();

        assert_eq!(
            expected, actual,
            "Expected amplitudes {:?}, but got {}",
            expected, state
        );
        assert_eq!(
            $level,
            state.level(),
            "Expected level {}, but got {}",
            $level,
            state
        );
    }};
}
