//! Feature derivation over a finished sample sequence.

use aimscan_core::{
    angle_delta, elapsed_ms, view_angles_from_direction, AimSample, AngularComponents,
};

/// Compute angular velocity, angular acceleration, and angle-to-target
/// in place.
///
/// For each consecutive pair with a positive time delta, velocity is the
/// wrap-normalized angle delta divided by the delta (degrees/ms per axis)
/// and acceleration is the change from the previous sample's velocity
/// divided by the same delta. Pairs with a non-positive delta leave the
/// later sample's velocity and acceleration at zero. Samples with a target
/// get the target's aim angles and the per-axis deviation from them.
pub fn derive_features(samples: &mut [AimSample]) {
    for i in 0..samples.len() {
        if i > 0 {
            let (prev_time, prev_angles, prev_velocity) = {
                let prev = &samples[i - 1];
                (prev.timestamp, prev.view_angles, prev.angular_velocity)
            };
            let cur = &mut samples[i];
            let dt = elapsed_ms(prev_time, cur.timestamp);
            if dt > 0 {
                let dt = dt as f32;
                let (dp, dy) = angle_delta(prev_angles, cur.view_angles);
                let velocity = AngularComponents::from_axes(dp / dt, dy / dt);
                cur.angular_velocity = velocity;
                cur.angular_acceleration = AngularComponents::from_axes(
                    (velocity.pitch - prev_velocity.pitch) / dt,
                    (velocity.yaw - prev_velocity.yaw) / dt,
                );
            }
        }

        let cur = &mut samples[i];
        let (position, view) = (cur.position, cur.view_angles);
        if let Some(target) = cur.target.as_mut() {
            let aim = view_angles_from_direction(target.position - position);
            let (dp, dy) = angle_delta(aim, view);
            target.target_angles = aim;
            target.angle_to_target = AngularComponents::from_axes(dp, dy);
        }
    }
}
