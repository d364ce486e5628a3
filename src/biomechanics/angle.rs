//! 各指標で共通の角度計算
//!
//! 角度は度単位で [0, 180]。`acos` の前に cos を [-1, 1] にクランプする。

/// 頂点 `p2` における `p2→p1` と `p2→p3` のなす角
///
/// どちらかのベクトルの長さが 0（点が重なる）なら `0.0` を返す。
pub fn angle(p1: (f64, f64), p2: (f64, f64), p3: (f64, f64)) -> f64 {
    let v1 = (p1.0 - p2.0, p1.1 - p2.1);
    let v2 = (p3.0 - p2.0, p3.1 - p2.1);

    let mag1 = v1.0.hypot(v1.1);
    let mag2 = v2.0.hypot(v2.1);
    if mag1 == 0.0 || mag2 == 0.0 {
        return 0.0;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    (dot / (mag1 * mag2)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// 単位ベクトル `reference` と `v` のなす角（`v` の長さが 0 なら None）
pub fn angle_from_reference(reference: (f64, f64), v: (f64, f64)) -> Option<f64> {
    let mag = v.0.hypot(v.1);
    if mag == 0.0 {
        return None;
    }
    let cos = (reference.0 * v.0 + reference.1 * v.1) / mag;
    Some(cos.clamp(-1.0, 1.0).acos().to_degrees())
}

/// 画像座標の上方向（y は下向きに増える）
pub const VERTICAL_UP: (f64, f64) = (0.0, -1.0);
/// 画像座標の右方向
pub const HORIZONTAL_RIGHT: (f64, f64) = (1.0, 0.0);
