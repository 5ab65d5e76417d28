use vergen::EmitBuilder;

fn main() {
    // 生成构建元信息（版本、git 提交）
    EmitBuilder::builder()
        .all_build()
        .all_git()
        .emit()
        .expect("Failed to generate build information");
}
