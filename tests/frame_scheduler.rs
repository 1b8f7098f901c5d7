mod tests {
    use embassy_time::{Duration, Instant};
    use lightdancer::ChannelConfig;
    use lightdancer::frame_scheduler::{DEFAULT_FRAME_DURATION, FrameScheduler};

    #[test]
    fn test_first_tick_has_no_elapsed_time() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(20), Duration::from_millis(5));
        let tick = scheduler.tick(Instant::from_millis(1000));

        assert_eq!(tick.elapsed_us, 0);
        assert_eq!(tick.next_deadline, Instant::from_millis(1020));
        assert_eq!(tick.sleep_duration, Duration::from_millis(20));
    }

    #[test]
    fn test_ticks_follow_the_frame_duration() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(20), Duration::from_millis(5));
        scheduler.tick(Instant::from_millis(1000));

        let tick = scheduler.tick(Instant::from_millis(1023));
        assert_eq!(tick.elapsed_us, 23_000);
        assert_eq!(tick.next_deadline, Instant::from_millis(1040));
        assert_eq!(tick.sleep_duration, Duration::from_millis(17));
    }

    #[test]
    fn test_late_tick_does_not_sleep() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(20), Duration::from_millis(5));
        scheduler.tick(Instant::from_millis(1000));

        let tick = scheduler.tick(Instant::from_millis(1050));
        assert_eq!(tick.next_deadline, Instant::from_millis(1040));
        assert_eq!(tick.sleep_duration, Duration::from_millis(0));
    }

    #[test]
    fn test_stall_resets_the_schedule() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(20), Duration::from_millis(5));
        scheduler.tick(Instant::from_millis(1000));

        let tick = scheduler.tick(Instant::from_millis(1500));
        assert_eq!(tick.elapsed_us, 500_000);
        assert_eq!(tick.next_deadline, Instant::from_millis(1520));
    }

    #[test]
    fn test_wire_time_caps_the_frame_rate() {
        let slow_wire = FrameScheduler::new(Duration::from_millis(10), Duration::from_millis(40));
        assert_eq!(slow_wire.frame_duration(), Duration::from_millis(40));

        // 3800 LEDs at 800 kbit/s take 114 ms plus the latch
        let long_strip = FrameScheduler::for_strip(&ChannelConfig::DEFAULT, 3800);
        assert_eq!(long_strip.frame_duration(), Duration::from_micros(114_320));

        let short_strip = FrameScheduler::for_strip(&ChannelConfig::DEFAULT, 60);
        assert_eq!(short_strip.frame_duration(), DEFAULT_FRAME_DURATION);
    }

    #[test]
    fn test_reset_forgets_the_last_tick() {
        let mut scheduler = FrameScheduler::new(Duration::from_millis(20), Duration::from_millis(5));
        scheduler.tick(Instant::from_millis(1000));
        scheduler.reset();

        assert_eq!(scheduler.tick(Instant::from_millis(1010)).elapsed_us, 0);
    }
}
