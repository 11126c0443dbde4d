use crate::Image;
use image::Rgba;

/// ガウシアンぼかしの近似としてよく使われるパス数
pub const GAUSSIAN_PASSES: u32 = 3;

const CHANNELS: usize = 4;

/// 分離可能ボックスブラーを提供するトレイト
///
/// 水平方向と垂直方向のスライディングウィンドウ平均を1パスとして、
/// 指定回数だけ繰り返すことでガウシアンぼかしを近似します。
/// 画像外の参照は最も近い端のピクセルに丸め込まれます（エッジ複製）。
/// RGBチャンネルのみを処理し、アルファチャンネルはそのままコピーされます。
pub trait BoxBlur {
    /// 指定した半径とパス数でボックスブラーを適用する
    ///
    /// # 引数
    ///
    /// * `radius` - カーネルの半径（ピクセル単位）。ウィンドウ幅は `2 * radius + 1`
    /// * `passes` - 水平＋垂直パスを繰り返す回数
    ///
    /// # 戻り値
    ///
    /// 同じ寸法の新しい画像。`radius` または `passes` が0の場合は入力のコピー
    ///
    /// # パフォーマンス
    ///
    /// 累積和をスライドさせるため、1ピクセルあたりのコストは
    /// 半径に依存しません。
    #[must_use]
    fn box_blur(&self, radius: u32, passes: u32) -> Self;

    /// 3パスのボックスブラー（ガウシアン近似）を適用する
    #[must_use]
    fn gaussian_approx(&self, radius: u32) -> Self
    where
        Self: Sized,
    {
        self.box_blur(radius, GAUSSIAN_PASSES)
    }
}

impl BoxBlur for Image<Rgba<u8>> {
    fn box_blur(&self, radius: u32, passes: u32) -> Self {
        if radius == 0 || passes == 0 || self.width() == 0 || self.height() == 0 {
            return self.clone();
        }

        let mut current = self.clone();
        for _ in 0..passes {
            current = blur_pass(&current, radius, Direction::Horizontal);
            current = blur_pass(&current, radius, Direction::Vertical);
        }
        current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Vertical,
}

/// 1方向のスライディングウィンドウ平均
///
/// 各ラインについてチャンネルごとに窓の合計を保持し、
/// 入る画素を加算・出る画素を減算して更新する。
/// 合計は `u64` で保持するため `u32` の任意の半径で桁あふれしない。
fn blur_pass(src: &Image<Rgba<u8>>, radius: u32, direction: Direction) -> Image<Rgba<u8>> {
    let (width, height) = src.dimensions();
    let (width, height) = (width as usize, height as usize);
    let data = src.as_raw();
    let mut out = src.clone();
    let dst: &mut [u8] = &mut out;

    // ライン長・ライン数・ライン内の画素間隔・ライン間隔（いずれも画素単位）
    let (length, lines, step, stride) = match direction {
        Direction::Horizontal => (width, height, 1, width),
        Direction::Vertical => (height, width, width, 1),
    };

    let r = i64::from(radius);
    let last = length as i64 - 1;
    let window = 2 * u64::from(radius) + 1;
    let offset = |line: usize, pos: i64| -> usize {
        (line * stride + pos.clamp(0, last) as usize * step) * CHANNELS
    };

    for line in 0..lines {
        for channel in 0..3 {
            let sample = |pos: i64| u64::from(data[offset(line, pos) + channel]);

            // 初期ウィンドウ [-r, r] を閉じた形で求める：
            // 左側の r 個は先頭画素、右端を越えた分は末尾画素の複製
            let inside = r.min(last);
            let mut sum = u64::from(radius) * sample(0)
                + (0..=inside).map(sample).sum::<u64>()
                + (r - inside) as u64 * sample(last);

            for pos in 0..length as i64 {
                dst[offset(line, pos) + channel] = (sum / window) as u8;
                sum += sample(pos + r + 1);
                sum -= sample(pos - r);
            }
        }
    }

    // `out` は入力の複製から始まるためアルファはそのまま残る
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_gradient_rgba_image, create_uniform_rgba_image};

    #[test]
    fn box_blur_with_zero_radius_returns_identical_image() {
        let image = create_gradient_rgba_image(7, 5);
        assert_eq!(image.box_blur(0, 3), image);
    }

    #[test]
    fn box_blur_with_zero_passes_returns_identical_image() {
        let image = create_gradient_rgba_image(7, 5);
        assert_eq!(image.box_blur(2, 0), image);
    }

    #[test]
    fn box_blur_preserves_flat_image() {
        let image = create_uniform_rgba_image(10, 10, Rgba([128, 64, 200, 255]));
        assert_eq!(image.box_blur(2, 3), image);
    }

    #[test]
    fn box_blur_single_bright_pixel_center_value() {
        let mut image = create_uniform_rgba_image(9, 9, Rgba([0, 0, 0, 255]));
        image.put_pixel(4, 4, Rgba([255, 255, 255, 255]));

        let blurred = image.box_blur(1, 1);

        let expected = (255.0f32 / 9.0).round() as u8;
        assert_eq!(blurred.get_pixel(4, 4), &Rgba([expected, expected, expected, 255]));
        // 3x3の近傍外には広がらない
        assert_eq!(blurred.get_pixel(2, 4), &Rgba([0, 0, 0, 255]));
        assert_eq!(blurred.get_pixel(3, 3), &Rgba([expected, expected, expected, 255]));
    }

    #[test]
    fn box_blur_replicates_edges_instead_of_wrapping() {
        // 左端だけ白い1行画像：ラップアラウンドなら右端が明るくなる
        let mut image = create_uniform_rgba_image(6, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(0, 0, Rgba([255, 255, 255, 255]));

        let blurred = image.box_blur(1, 1);

        // 左端の窓は [x0, x0, x1] → 510 / 3
        assert_eq!(blurred.get_pixel(0, 0)[0], 170);
        assert_eq!(blurred.get_pixel(1, 0)[0], 85);
        assert_eq!(blurred.get_pixel(5, 0)[0], 0);
    }

    #[test]
    fn box_blur_does_not_darken_bright_borders() {
        let image = create_uniform_rgba_image(4, 4, Rgba([255, 255, 255, 255]));
        let blurred = image.box_blur(3, 3);
        assert!(blurred.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn box_blur_keeps_alpha() {
        let mut image = create_gradient_rgba_image(5, 5);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            pixel[3] = ((x * 50 + y * 3) % 256) as u8;
        }

        let blurred = image.box_blur(2, 3);

        for (before, after) in image.pixels().zip(blurred.pixels()) {
            assert_eq!(before[3], after[3]);
        }
    }

    #[test]
    fn box_blur_radius_larger_than_image_is_well_defined() {
        let image = create_gradient_rgba_image(3, 2);
        let blurred = image.box_blur(10, 2);
        assert_eq!(blurred.dimensions(), (3, 2));
    }

    #[test]
    fn box_blur_wide_window_weights_replicated_ends() {
        // 半径5の窓は [x0 x6, x1, x2 x4] → 390 / 11 のように端画素を重複して数える
        let mut image = create_uniform_rgba_image(3, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([30, 30, 30, 255]));
        image.put_pixel(2, 0, Rgba([90, 90, 90, 255]));

        let blurred = image.box_blur(5, 1);

        let row: Vec<u8> = blurred.pixels().map(|p| p[0]).collect();
        assert_eq!(row, vec![35, 43, 51]);
    }

    #[test]
    fn box_blur_huge_radius_does_not_overflow() {
        let image = create_uniform_rgba_image(2, 1, Rgba([255, 255, 255, 255]));
        assert_eq!(image.box_blur(9_000_000, 1), image);
        assert_eq!(image.box_blur(u32::MAX, 2), image);
    }

    #[test]
    fn box_blur_huge_radius_averages_whole_line() {
        // 半径が十分大きいと両端の複製が支配的になり、平均は端の値に近づく
        let mut image = create_uniform_rgba_image(2, 1, Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([200, 200, 200, 255]));

        let blurred = image.box_blur(1_000_000, 1);

        assert_eq!(blurred.get_pixel(0, 0)[0], 99);
        assert_eq!(blurred.get_pixel(1, 0)[0], 100);
    }

    #[test]
    fn gaussian_approx_runs_three_passes() {
        let image = create_gradient_rgba_image(8, 8);
        assert_eq!(image.gaussian_approx(2), image.box_blur(2, 3));
    }
}
