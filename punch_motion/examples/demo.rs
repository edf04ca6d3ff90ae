//! Walks a synthetic right uppercut and a guard through the classifier and
//! prints the per-frame decision with the right arm's kinematics.

use punch_motion::{
    ActionMapper, BodyPart, ClassifierConfig, FrameSize, GestureClassifier, KeyMap, Landmark,
    LandmarkFrame, Side,
};

fn main() {
    println!("\n=== punch_motion demo ===\n");

    let mut classifier = GestureClassifier::new(ClassifierConfig::default())
        .expect("default config is valid");
    let keys = KeyMap::default();
    let size = FrameSize::new(640.0, 480.0).expect("positive frame size");

    let nose = Landmark::new(320.0, 150.0);
    let mut t = 1.0;

    // ── 1. Right uppercut: wrist rises 50 px per frame at 40 fps ──────────
    println!("1. Right uppercut");
    for i in 0..8 {
        let y = 330.0 - 50.0 * i as f64;
        let frame = LandmarkFrame::new()
            .with(BodyPart::Nose, nose)
            .with(BodyPart::RightShoulder, Landmark::new(250.0, 240.0))
            .with(BodyPart::RightWrist, Landmark::new(230.0, y));
        report(&mut classifier, &keys, &frame, t, size);
        t += 0.025;
    }

    // ── 2. Guard: both wrists in front of the face ────────────────────────
    println!("\n2. Guard held for one second");
    t += 1.0;
    for _ in 0..5 {
        let frame = LandmarkFrame::new()
            .with(BodyPart::Nose, nose)
            .with(BodyPart::RightWrist, Landmark::new(305.0, 175.0))
            .with(BodyPart::LeftWrist, Landmark::new(335.0, 175.0));
        report(&mut classifier, &keys, &frame, t, size);
        t += 0.25;
    }
    println!();
}

fn report(
    classifier: &mut GestureClassifier,
    keys: &KeyMap,
    frame: &LandmarkFrame,
    t: f64,
    size: FrameSize,
) {
    let label = classifier.process_frame(frame, t, size);
    let speed = classifier.kinematics(Side::Right).map_or(0.0, |k| k.speed);
    match keys.action_for(label) {
        Some(key) => println!("   t={:6.3}  speed={:7.1}  {:<12} → key '{}'", t, speed, label, key),
        None => println!("   t={:6.3}  speed={:7.1}  -", t, speed),
    }
}
