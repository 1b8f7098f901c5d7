mod tests {
    use core::f64::consts::TAU;

    use lightdancer::config::{FFT_BINS, FFT_SIZE, SAMPLE_RATE_HZ};
    use lightdancer::fft::{FixedPointFft, Window};
    use lightdancer::{Fft, WaveGen};

    const WINDOWS: [Window; 3] = [Window::Bartlett, Window::Hann, Window::BlackmanHarris];
    const NORMALIZED_PEAK: u16 = 52428;

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn sine<const N: usize>(bin: usize, amplitude: i16) -> [i16; N] {
        core::array::from_fn(|n| {
            let phase = TAU * (bin * n) as f64 / N as f64;
            (f64::from(amplitude) * libm::sin(phase)) as i16
        })
    }

    fn argmax<T: Copy + Ord>(values: &[T]) -> usize {
        let mut best = 0;
        for (index, &value) in values.iter().enumerate() {
            if value > values[best] {
                best = index;
            }
        }
        best
    }

    fn is_strict_peak<T: Copy + Ord>(values: &[T], bin: usize) -> bool {
        values
            .iter()
            .enumerate()
            .all(|(index, &value)| index == bin || value < values[bin])
    }

    fn assert_sines_peak_at_their_bin<const N: usize, const BINS: usize>() {
        for window in WINDOWS {
            let narrow = FixedPointFft::<N, BINS, i16, u16>::new(window);
            let wide = FixedPointFft::<N, BINS, i16, u32>::new(window);
            for bin in 1..N / 2 {
                let samples = sine::<N>(bin, 16000);
                let magnitudes = narrow.magnitudes(&samples);
                assert!(
                    is_strict_peak(&magnitudes, bin),
                    "N={N} {window:?} bin {bin}: {magnitudes:?}"
                );
                let magnitudes = wide.magnitudes(&samples);
                assert!(
                    is_strict_peak(&magnitudes, bin),
                    "N={N} {window:?} bin {bin}: {magnitudes:?}"
                );
            }
        }
    }

    #[test]
    fn test_bin_count_is_half_plus_one() {
        assert_eq!(Fft::SIZE, FFT_SIZE);
        assert_eq!(Fft::BIN_COUNT, FFT_SIZE / 2 + 1);

        let fft = Fft::new(Window::Hann);
        assert_eq!(fft.magnitudes(&[0; FFT_SIZE]).len(), FFT_BINS);
        assert_eq!(fft.window(), Window::Hann);

        let small = FixedPointFft::<16, 9, i16, u32>::new(Window::Bartlett);
        assert_eq!(small.magnitudes(&[0; 16]).len(), 9);
    }

    #[test]
    fn test_zero_input_gives_zero_spectrum() {
        for window in WINDOWS {
            let narrow = FixedPointFft::<64, 33, i16, u16>::new(window);
            assert!(narrow.magnitudes(&[0; 64]).iter().all(|&m| m == 0));

            let wide = FixedPointFft::<64, 33, i32, u32>::new(window);
            assert!(wide.magnitudes(&[0; 64]).iter().all(|&m| m == 0));
        }
    }

    #[test]
    fn test_sines_peak_at_their_bin_16() {
        assert_sines_peak_at_their_bin::<16, 9>();
    }

    #[test]
    fn test_sines_peak_at_their_bin_64() {
        assert_sines_peak_at_their_bin::<64, 33>();
    }

    #[test]
    fn test_sines_peak_at_their_bin_256() {
        assert_sines_peak_at_their_bin::<256, 129>();
    }

    #[test]
    fn test_hann_256_bin_10_stands_out() {
        let fft = Fft::new(Window::Hann);
        let magnitudes = fft.magnitudes(&sine::<256>(10, 16000));

        let peak = magnitudes[10];
        assert_eq!(argmax(&magnitudes), 10);
        assert!(is_strict_peak(&magnitudes, 10));
        assert!(peak > NORMALIZED_PEAK / 2 && peak <= NORMALIZED_PEAK);
        for (bin, &magnitude) in magnitudes.iter().enumerate() {
            if bin.abs_diff(10) > 3 {
                assert!(magnitude < peak / 10, "bin {bin}: {magnitude}");
            }
        }
    }

    #[test]
    fn test_generated_tone_lands_on_its_bin() {
        type Gen = WaveGen<44_100, 256>;
        let fft = Fft::new(Window::Hann);
        let samples = Gen::sin_with_amplitude(Gen::bin_frequency(10), 16000);

        assert_eq!(argmax(&fft.magnitudes(&samples)), 10);
    }

    #[test]
    fn test_quiet_narrow_output_is_not_rescaled() {
        let narrow = FixedPointFft::<256, 129, i16, u16>::new(Window::Hann);
        let wide = FixedPointFft::<256, 129, i16, u32>::new(Window::Hann);
        let samples = sine::<256>(10, 500);

        let narrow = narrow.magnitudes(&samples);
        let wide = wide.magnitudes(&samples);
        assert!(u32::from(narrow[10]) <= u32::from(NORMALIZED_PEAK));
        assert!(narrow.iter().zip(&wide).all(|(&n, &w)| u32::from(n) == w));
    }

    #[test]
    fn test_loud_narrow_output_is_rescaled_under_the_threshold() {
        let narrow = FixedPointFft::<256, 129, i16, u16>::new(Window::Hann);
        let wide = FixedPointFft::<256, 129, i16, u32>::new(Window::Hann);

        for amplitude in [3000, 16000, i16::MAX] {
            let samples = sine::<256>(10, amplitude);
            let peak = *narrow.magnitudes(&samples).iter().max().unwrap();
            assert!(peak > NORMALIZED_PEAK / 2 && peak <= NORMALIZED_PEAK, "{amplitude}: {peak}");

            let wide_peak = *wide.magnitudes(&samples).iter().max().unwrap();
            assert!(wide_peak > u32::from(NORMALIZED_PEAK));
        }
    }

    #[test]
    fn test_wide_dc_grows_with_constant_input() {
        for window in WINDOWS {
            let fft = FixedPointFft::<64, 33, i16, u32>::new(window);
            let mut previous = 0;
            for level in (0..=32_000).step_by(500) {
                let dc = fft.magnitudes(&[level; 64])[0];
                assert!(dc >= previous, "{window:?} level {level}: {dc} < {previous}");
                previous = dc;
            }
            assert!(previous > 0);
        }
    }

    #[test]
    fn test_narrow_dc_grows_until_rescaling() {
        let fft = FixedPointFft::<64, 33, i16, u16>::new(Window::Hann);
        let mut previous = 0;
        for level in (0..=1600).step_by(100) {
            let dc = fft.magnitudes(&[level; 64])[0];
            assert!(dc >= previous, "level {level}: {dc} < {previous}");
            previous = dc;
        }
    }

    #[test]
    fn test_wide_input_drops_the_low_byte() {
        let narrow = FixedPointFft::<64, 33, i16, u32>::new(Window::Hann);
        let wide = FixedPointFft::<64, 33, i32, u32>::new(Window::Hann);
        let samples = sine::<64>(5, 12000);
        let shifted: [i32; 64] = core::array::from_fn(|n| (i32::from(samples[n]) << 8) | 0x7F);

        assert_eq!(narrow.magnitudes(&samples), wide.magnitudes(&shifted));
    }

    #[test]
    fn test_wide_input_saturates() {
        let clipped = FixedPointFft::<64, 33, i16, u32>::new(Window::Bartlett);
        let wide = FixedPointFft::<64, 33, i32, u32>::new(Window::Bartlett);

        let expected = clipped.magnitudes(&[i16::MAX; 64]);
        assert_eq!(wide.magnitudes(&[i32::MAX; 64]), expected);
        assert_eq!(wide.magnitudes(&[1 << 30; 64]), expected);
    }

    #[test]
    fn test_results_are_repeatable() {
        let fft = Fft::new(Window::BlackmanHarris);
        let samples = sine::<256>(37, 9000);

        let mut into = [0u16; 129];
        fft.magnitudes_into(&samples, &mut into);
        assert_eq!(fft.magnitudes(&samples), into);
        assert_eq!(fft.magnitudes(&samples), into);
    }

    #[test]
    fn test_bin_frequencies() {
        assert_eq!(Fft::bin_frequency_hz(0, SAMPLE_RATE_HZ), 0);
        assert_eq!(Fft::bin_frequency_hz(10, SAMPLE_RATE_HZ), 1722);
        assert_eq!(Fft::bin_frequency_hz(128, SAMPLE_RATE_HZ), 22050);

        assert_eq!(Fft::bin_for_frequency(1722, SAMPLE_RATE_HZ), 10);
        assert_eq!(Fft::bin_for_frequency(1800, SAMPLE_RATE_HZ), 10);
        assert_eq!(Fft::bin_for_frequency(30_000, SAMPLE_RATE_HZ), 128);
        assert_eq!(Fft::bin_for_frequency(1000, 0), 0);
    }
}
